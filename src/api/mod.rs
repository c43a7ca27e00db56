pub mod client;

pub use client::ApiClient;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::analysis::AnalysisReport;
use crate::domain::email::{EmailId, EmailSummary};

/// What can go wrong talking to the backend: the transport failed, the
/// server answered non-2xx, or the body was not the JSON we expected.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Impossible de se connecter au serveur: {0}")]
    Network(#[source] reqwest::Error),
    #[error("{detail}")]
    Status { status: u16, detail: String },
    #[error("Réponse inattendue du serveur: {0}")]
    Decode(#[source] serde_json::Error),
}

/// The two calls the synchronization core needs. `ApiClient` is the real
/// implementation; tests substitute scripted fakes.
pub trait Backend: Send + Sync {
    fn fetch_emails(&self) -> Result<Vec<EmailSummary>, ApiError>;
    fn analyze_email(&self, id: &EmailId) -> Result<AnalysisReport, ApiError>;
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    detail: Option<String>,
}

/// Shared response handling: non-2xx surfaces the backend's optional
/// `{"detail": ...}` message, otherwise decode the expected shape.
pub(crate) fn handle_response<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    body: &[u8],
) -> Result<T, ApiError> {
    if !status.is_success() {
        let detail = serde_json::from_slice::<ErrorPayload>(body)
            .ok()
            .and_then(|p| p.detail)
            .unwrap_or_else(|| format!("Erreur HTTP {}", status.as_u16()));
        return Err(ApiError::Status {
            status: status.as_u16(),
            detail,
        });
    }
    serde_json::from_slice(body).map_err(ApiError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn ok_body_decodes() {
        let emails: Vec<EmailSummary> = handle_response(
            StatusCode::OK,
            br#"[{"id":"1","sender":"a@x.com","subject":"S","preview":"P","timestamp":"t"}]"#,
        )
        .unwrap();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].id, "1");
        assert!(!emails[0].is_analyzing);
    }

    #[test]
    fn error_detail_is_surfaced() {
        let err = handle_response::<Vec<EmailSummary>>(
            StatusCode::SERVICE_UNAVAILABLE,
            br#"{"detail":"Service Gmail non disponible."}"#,
        )
        .unwrap_err();
        match err {
            ApiError::Status { status, detail } => {
                assert_eq!(status, 503);
                assert_eq!(detail, "Service Gmail non disponible.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_without_payload_falls_back_to_status() {
        let err =
            handle_response::<Vec<EmailSummary>>(StatusCode::BAD_GATEWAY, b"<html>oops</html>")
                .unwrap_err();
        match err {
            ApiError::Status { status, detail } => {
                assert_eq!(status, 502);
                assert_eq!(detail, "Erreur HTTP 502");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_success_body_is_a_decode_error() {
        let err = handle_response::<Vec<EmailSummary>>(StatusCode::OK, b"not json").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
