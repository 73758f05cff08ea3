use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hyper::ext::ReasonPhrase;
use serde_json::json;
use tracing::error;

use crate::error::PhonebookError;

/// the HTTP status a [`PhonebookError`] is reported with
pub fn error_status(err: &PhonebookError) -> StatusCode {
    match err {
        PhonebookError::InvalidInput(_)
        | PhonebookError::DuplicateName
        | PhonebookError::MalformedId(_) => StatusCode::BAD_REQUEST,
        PhonebookError::NotFound(_) | PhonebookError::UnknownRoute => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Every error becomes a `{"error": "..."}` JSON body. A missing contact also carries its
/// message as the reason phrase of the status line.
impl IntoResponse for PhonebookError {
    fn into_response(self) -> Response {
        let status = error_status(&self);
        if !self.is_client_error() {
            error!("request failed: {}", self);
        }

        let message = self.to_string();
        let not_found = matches!(self, PhonebookError::NotFound(_));
        let mut response = (status, Json(json!({ "error": message }))).into_response();
        if not_found {
            if let Ok(reason) = ReasonPhrase::try_from(message) {
                response.extensions_mut().insert(reason);
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(error_status(&PhonebookError::DuplicateName), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_status(&PhonebookError::MalformedId("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&PhonebookError::NotFound("0000000000000001".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(error_status(&PhonebookError::UnknownRoute), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_errors_map_to_500() {
        let err = PhonebookError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert_eq!(error_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_carries_a_reason_phrase() {
        let response = PhonebookError::NotFound("0000000000000007".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let reason = response
            .extensions()
            .get::<ReasonPhrase>()
            .expect("reason phrase");
        assert_eq!(reason.as_bytes(), b"person with id 0000000000000007 not found");
    }
}
