//! # Request Extraction
//!
//! Handlers take the raw extractor result and pass it through these helpers
//! so every malformed input turns into [`AppError::BadRequest`] with the
//! same body shape as the other errors.

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Extract query parameters, mapping rejections to [`AppError::BadRequest`].
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    result
        .map(|Query(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Parse a JSON request body regardless of the declared content type.
///
/// The form posts its payload from script, and older clients send it as
/// `text/plain`, so the body is parsed from bytes instead of through `Json`.
pub fn parse_json_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(bytes).map_err(|err| AppError::BadRequest(err.to_string()))
}

#[cfg(test)]
mod tests {
    use pform_core::PenaltyForm;

    use super::*;

    #[test]
    fn parses_form_body() {
        let form: PenaltyForm =
            parse_json_body(br#"{"firstName":"Ana","occurrenceCount":2}"#).unwrap();
        assert_eq!(form.first_name.as_deref(), Some("Ana"));
        assert_eq!(form.occurrence_count, Some(2));
    }

    #[test]
    fn non_json_is_bad_request() {
        let err = parse_json_body::<PenaltyForm>(b"firstName=Ana").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn fractional_count_is_bad_request() {
        let err = parse_json_body::<PenaltyForm>(br#"{"occurrenceCount":2.5}"#).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
