//! Blocking HTTP backend: one JSON POST per prediction.

use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

use super::{parse_response, PredictRequest, Predictor};
use crate::canvas::ImagePayload;
use crate::{Error, PadConfig, Result};

/// Posts `{"image": <data url>}` to the configured endpoint and reads
/// `{"predicted_digit": <int>}` back.
///
/// The client has no request timeout: a submission resolves only when the
/// endpoint answers or the connection fails.
pub struct HttpPredictor {
    client: Client,
    config: PadConfig,
}

impl HttpPredictor {
    pub fn new(config: PadConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::ConfigError(format!("invalid header name {:?}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::ConfigError(format!("invalid header value for {}: {}", name, e)))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| Error::InitializationError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

impl Predictor for HttpPredictor {
    fn predict(&self, image: &ImagePayload) -> Result<u8> {
        let body = PredictRequest::from_payload(image);
        debug!(
            "POST {} ({} byte png, {} byte body)",
            self.config.endpoint,
            image.png_data.len(),
            body.image.len()
        );

        let resp = self.client.post(self.config.endpoint.as_str()).json(&body).send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::StatusError(status.as_u16()));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| Error::NetworkError(format!("Failed to read response body: {}", e)))?;
        parse_response(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn payload() -> ImagePayload {
        crate::canvas::Canvas::new().export_image().expect("export")
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = PadConfig {
            endpoint: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(HttpPredictor::new(cfg), Err(Error::ConfigError(_))));

        let mut cfg = PadConfig::default();
        cfg.headers.insert("bad header".into(), "x".into());
        assert!(matches!(HttpPredictor::new(cfg), Err(Error::ConfigError(_))));
    }

    #[test]
    fn posts_json_and_reads_digit() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr();

        let handle = std::thread::spawn(move || {
            let mut request = server.recv().expect("request");
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body).unwrap();
            let method = request.method().to_string();
            let content_type = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Content-Type"))
                .map(|h| h.value.to_string());
            let token = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("X-Token"))
                .map(|h| h.value.to_string());
            let response = tiny_http::Response::from_string(r#"{"predicted_digit": 4}"#)
                .with_header("Content-Type: application/json".parse::<tiny_http::Header>().unwrap());
            let _ = request.respond(response);
            (method, content_type, token, body)
        });

        let mut cfg = PadConfig {
            endpoint: format!("http://{}/predict", addr),
            ..Default::default()
        };
        cfg.headers.insert("X-Token".into(), "abc".into());
        let predictor = HttpPredictor::new(cfg).expect("predictor");
        let image = payload();
        assert_eq!(predictor.predict(&image).expect("predict"), 4);

        let (method, content_type, token, body) = handle.join().unwrap();
        assert_eq!(method, "POST");
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(token.as_deref(), Some("abc"));
        let sent: PredictRequest = serde_json::from_str(&body).expect("json body");
        assert_eq!(sent.image, image.to_data_url());
    }

    #[test]
    fn non_success_status_is_an_error() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr();
        std::thread::spawn(move || {
            if let Ok(request) = server.recv() {
                let _ = request.respond(
                    tiny_http::Response::from_string(r#"{"predicted_digit": 1}"#)
                        .with_status_code(503),
                );
            }
        });

        let predictor = HttpPredictor::new(PadConfig {
            endpoint: format!("http://{}/predict", addr),
            ..Default::default()
        })
        .unwrap();
        assert!(matches!(
            predictor.predict(&payload()),
            Err(Error::StatusError(503))
        ));
    }

    #[test]
    fn connection_refused_is_a_network_error() {
        // Bind then drop to get a port nobody is listening on
        let port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let predictor = HttpPredictor::new(PadConfig {
            endpoint: format!("http://127.0.0.1:{}/predict", port),
            ..Default::default()
        })
        .unwrap();
        assert!(matches!(
            predictor.predict(&payload()),
            Err(Error::NetworkError(_))
        ));
    }
}
