//! The digit pad: one canvas, one outcome, any number of submissions in
//! flight.

use log::{debug, info};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use crate::canvas::{Canvas, ImagePayload};
use crate::input::{Action, PointerEvent, Step};
use crate::outcome::Outcome;
use crate::predict::Predictor;
use crate::submission::{self, Completion, Ticket};
use crate::{Error, Result};

/// Owns all component state. Separate instances share nothing.
///
/// Submissions are not serialized: if several are in flight, outcomes are
/// applied in the order they complete, so the last one to finish is what the
/// pad shows. A late completion is applied even after `clear()`.
pub struct DigitPad {
    canvas: Canvas,
    outcome: Outcome,
    predictor: Arc<dyn Predictor>,
    done_tx: Sender<Completion>,
    done_rx: Receiver<Completion>,
    next_ticket: u64,
    pending: usize,
    last_applied: Option<Ticket>,
}

impl DigitPad {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        let (done_tx, done_rx) = mpsc::channel();
        Self {
            canvas: Canvas::new(),
            outcome: Outcome::Empty,
            predictor,
            done_tx,
            done_rx,
            next_ticket: 0,
            pending: 0,
            last_applied: None,
        }
    }

    pub fn with_predictor<P: Predictor + 'static>(predictor: P) -> Self {
        Self::new(Arc::new(predictor))
    }

    /// A pad talking to `config.endpoint` over HTTP
    #[cfg(feature = "remote")]
    pub fn from_config(config: crate::PadConfig) -> Result<Self> {
        let predictor = crate::predict::HttpPredictor::new(config)?;
        Ok(Self::with_predictor(predictor))
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn prediction(&self) -> Option<u8> {
        self.outcome.prediction()
    }

    pub fn error(&self) -> Option<&str> {
        self.outcome.error()
    }

    /// Submissions dispatched but not yet applied
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Ticket of the completion that produced the current outcome
    pub fn last_applied(&self) -> Option<Ticket> {
        self.last_applied
    }

    // --- Canvas surface ---

    pub fn begin_stroke(&mut self, x: f32, y: f32) {
        self.canvas.begin_stroke(x, y);
    }

    pub fn extend_stroke(&mut self, x: f32, y: f32) -> bool {
        self.canvas.extend_stroke(x, y)
    }

    pub fn end_stroke(&mut self) {
        self.canvas.end_stroke();
    }

    /// Wipe the drawing and forget the last prediction or error
    pub fn clear(&mut self) {
        self.canvas.clear();
        self.outcome = Outcome::Empty;
    }

    pub fn export_image(&self) -> Result<ImagePayload> {
        self.canvas.export_image()
    }

    // --- Bindings ---

    /// Returns whether the raster changed
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { x, y } => {
                self.begin_stroke(x, y);
                false
            }
            PointerEvent::Move { x, y } => self.extend_stroke(x, y),
            PointerEvent::Up | PointerEvent::Leave => {
                self.end_stroke();
                false
            }
        }
    }

    /// Clear yields `None`; Predict yields the ticket of the new submission
    pub fn handle_action(&mut self, action: Action) -> Option<Ticket> {
        match action {
            Action::Clear => {
                self.clear();
                None
            }
            Action::Predict => Some(self.submit()),
        }
    }

    pub fn replay<'a, I>(&mut self, steps: I) -> Vec<Ticket>
    where
        I: IntoIterator<Item = &'a Step>,
    {
        let mut tickets = Vec::new();
        for step in steps {
            match *step {
                Step::Pointer(ev) => {
                    self.handle_pointer(ev);
                }
                Step::Action(action) => tickets.extend(self.handle_action(action)),
            }
        }
        tickets
    }

    // --- Submission pipeline ---

    fn next_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    /// Capture the canvas now and start one prediction attempt in the
    /// background. Call [`pump`](Self::pump) or
    /// [`wait_idle`](Self::wait_idle) to apply the result.
    pub fn submit(&mut self) -> Ticket {
        let ticket = self.next_ticket();
        self.pending += 1;
        match self.canvas.export_image() {
            Ok(image) => {
                debug!("submission #{} dispatched", ticket.0);
                submission::dispatch(self.predictor.clone(), image, ticket, self.done_tx.clone());
            }
            Err(e) => {
                let _ = self.done_tx.send(Completion {
                    ticket,
                    result: Err(e),
                });
            }
        }
        ticket
    }

    /// Apply every completion that has already arrived. Never blocks.
    /// Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(done) = self.done_rx.try_recv() {
            self.apply(done);
            applied += 1;
        }
        applied
    }

    /// Block until every dispatched submission has been applied
    pub fn wait_idle(&mut self) {
        while self.pending > 0 {
            // We hold a sender ourselves, so recv only fails if that is gone.
            match self.done_rx.recv() {
                Ok(done) => self.apply(done),
                Err(_) => break,
            }
        }
    }

    /// Capture, exchange and apply inline
    pub fn submit_blocking(&mut self) -> &Outcome {
        let ticket = self.next_ticket();
        let result = self
            .canvas
            .export_image()
            .and_then(|image| self.predictor.predict(&image));
        self.settle(ticket, result);
        &self.outcome
    }

    /// Capture now, run the exchange on a worker thread and await it
    pub async fn submit_async(&mut self) -> &Outcome {
        let ticket = self.next_ticket();
        let result = match self.canvas.export_image() {
            Ok(image) => submission::request(self.predictor.clone(), image)
                .await
                .map_err(|e| Error::Other(format!("Prediction canceled: {}", e)))
                .and_then(|r| r),
            Err(e) => Err(e),
        };
        self.settle(ticket, result);
        &self.outcome
    }

    /// Apply an inline completion. Background completions already queued
    /// finished before it, so they go first.
    fn settle(&mut self, ticket: Ticket, result: Result<u8>) {
        self.pump();
        self.set_outcome(ticket, result);
    }

    fn apply(&mut self, done: Completion) {
        self.pending = self.pending.saturating_sub(1);
        self.set_outcome(done.ticket, done.result);
    }

    fn set_outcome(&mut self, ticket: Ticket, result: Result<u8>) {
        self.outcome = Outcome::from_result(result);
        self.last_applied = Some(ticket);
        info!("submission #{} applied: {:?}", ticket.0, self.outcome);
    }
}
