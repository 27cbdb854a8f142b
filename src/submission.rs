//! Off-thread prediction exchanges.
//!
//! Every submission gets its own thread so the owner of the canvas never
//! blocks on the network. Results come back either through an `mpsc`
//! channel drained by the pad (event-loop style) or through a `oneshot`
//! receiver that can be awaited.

use log::debug;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use tokio::sync::oneshot;

use crate::canvas::ImagePayload;
use crate::predict::Predictor;
use crate::{Error, Result};

/// Identifies one submission, in invocation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

/// A finished exchange, posted when the endpoint answered or failed
#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub result: Result<u8>,
}

fn run(predictor: &dyn Predictor, image: &ImagePayload) -> Result<u8> {
    panic::catch_unwind(AssertUnwindSafe(|| predictor.predict(image)))
        .unwrap_or_else(|_| Err(Error::Other("predictor panicked".into())))
}

/// Start an exchange on a new thread; its `Completion` is sent to `done`.
pub fn dispatch(
    predictor: Arc<dyn Predictor>,
    image: ImagePayload,
    ticket: Ticket,
    done: Sender<Completion>,
) {
    let fallback = done.clone();
    let spawned = thread::Builder::new()
        .name(format!("digitpad-submit-{}", ticket.0))
        .spawn(move || {
            let result = run(predictor.as_ref(), &image);
            debug!("submission #{} finished (ok = {})", ticket.0, result.is_ok());
            let _ = done.send(Completion { ticket, result });
        });

    if let Err(e) = spawned {
        let _ = fallback.send(Completion {
            ticket,
            result: Err(Error::Other(format!("Failed to spawn submission thread: {}", e))),
        });
    }
}

/// Start an exchange on a new thread and hand back a receiver for its result.
pub fn request(predictor: Arc<dyn Predictor>, image: ImagePayload) -> oneshot::Receiver<Result<u8>> {
    request_with(predictor, image, |job| {
        thread::Builder::new()
            .name("digitpad-request".into())
            .spawn(job)
            .map(|_| ())
    })
}

type Job = Box<dyn FnOnce() + Send + 'static>;

fn request_with<S>(
    predictor: Arc<dyn Predictor>,
    image: ImagePayload,
    spawn: S,
) -> oneshot::Receiver<Result<u8>>
where
    S: FnOnce(Job) -> io::Result<()>,
{
    let (tx, rx) = oneshot::channel();
    // The worker only gets the sender once it is known to be running, so a
    // failed spawn can still report through it.
    let (handoff_tx, handoff_rx) = mpsc::channel::<oneshot::Sender<Result<u8>>>();
    let spawned = spawn(Box::new(move || {
        let result = run(predictor.as_ref(), &image);
        if let Ok(tx) = handoff_rx.recv() {
            // Receiver may have been dropped; nothing to report to.
            let _ = tx.send(result);
        }
    }));

    match spawned {
        Ok(()) => {
            let _ = handoff_tx.send(tx);
        }
        Err(e) => {
            let _ = tx.send(Err(Error::Other(format!(
                "Failed to spawn submission thread: {}",
                e
            ))));
        }
    }
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn image() -> ImagePayload {
        ImagePayload {
            width: 1,
            height: 1,
            png_data: vec![0],
        }
    }

    #[test]
    fn dispatch_posts_completion() {
        let (tx, rx) = mpsc::channel();
        let p: Arc<dyn Predictor> = Arc::new(|_: &ImagePayload| -> Result<u8> { Ok(3) });
        dispatch(p, image(), Ticket(9), tx);
        let c = rx.recv_timeout(Duration::from_secs(5)).expect("completion");
        assert_eq!(c.ticket, Ticket(9));
        assert_eq!(c.result.unwrap(), 3);
    }

    #[test]
    fn panicking_predictor_becomes_an_error() {
        let (tx, rx) = mpsc::channel();
        let p: Arc<dyn Predictor> =
            Arc::new(|_: &ImagePayload| -> Result<u8> { panic!("model exploded") });
        dispatch(p, image(), Ticket(1), tx);
        let c = rx.recv_timeout(Duration::from_secs(5)).expect("completion");
        assert!(matches!(c.result, Err(Error::Other(_))));
    }

    #[tokio::test]
    async fn request_resolves_oneshot() {
        let p: Arc<dyn Predictor> = Arc::new(|_: &ImagePayload| -> Result<u8> { Ok(8) });
        let res = request(p, image()).await.expect("not canceled");
        assert_eq!(res.unwrap(), 8);
    }

    #[tokio::test]
    async fn request_reports_spawn_failure_through_receiver() {
        let p: Arc<dyn Predictor> = Arc::new(|_: &ImagePayload| -> Result<u8> { Ok(8) });
        let rx = request_with(p, image(), |_job| {
            Err(io::Error::new(io::ErrorKind::WouldBlock, "no threads left"))
        });
        let res = rx.await.expect("sender not dropped");
        match res {
            Err(Error::Other(msg)) => assert!(msg.contains("no threads left"), "{}", msg),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
