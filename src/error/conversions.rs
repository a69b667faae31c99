//! Type Conversions for GenerationError
//!
//! This module contains From trait implementations for converting
//! common error types into GenerationError.

use super::classify::{RawFailure, classify, classify_reqwest_error};
use super::types::GenerationError;

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        classify_reqwest_error(err)
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        classify(RawFailure::MissingText(format!("invalid JSON: {err}")))
    }
}

impl From<RawFailure> for GenerationError {
    fn from(failure: RawFailure) -> Self {
        classify(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: GenerationError = json_err.into();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_from_reqwest_connect_error() {
        // Grab a free port, then release it so the connect is refused.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };
        let err = reqwest::Client::new()
            .get(format!("http://127.0.0.1:{port}/"))
            .send()
            .await
            .expect_err("connection should fail");
        let err: GenerationError = err.into();
        assert_eq!(err.kind(), ErrorKind::NetworkUnreachable);
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn reqwest_errors_do_not_carry_the_request_url() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };
        let err = reqwest::Client::new()
            .get(format!("http://127.0.0.1:{port}/models?key=AIzaSecretValue"))
            .send()
            .await
            .expect_err("connection should fail");
        let err: GenerationError = err.into();
        assert!(!err.to_string().contains("AIzaSecretValue"));
        assert!(!format!("{err:?}").contains("AIzaSecretValue"));
        assert!(logs_contain("no response"));
        assert!(!logs_contain("AIzaSecretValue"));
    }
}
