//! # API Errors
//!
//! Every failure a request can hit, from CSV parsing to the datastore, is an
//! `ApiError`. The `ResponseError` impl is the single place where errors turn
//! into HTTP responses: always `500 Internal Server Error` with a
//! `{"error": "<message>"}` body, so clients see one uniform failure shape.

use crate::store::DatastoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::responses::ErrorResponse;
use log::error;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body, mapping or CSV bytes could not be parsed.
    #[error("{0}")]
    MalformedInput(String),

    /// The import request lacks its file or its mapping.
    #[error("{0}")]
    MissingUpload(String),

    /// The upload was refused before decoding (wrong MIME type).
    #[error("{0}")]
    RejectedUpload(String),

    #[error("Invalid date for {field}: '{value}'")]
    InvalidDate { field: String, value: String },

    /// Required fields missing on a candidate record.
    #[error("Missing required fields: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error(transparent)]
    Datastore(#[from] DatastoreError),
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::MalformedInput(format!("Invalid CSV: {}", err))
    }
}

impl From<actix_multipart::MultipartError> for ApiError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        ApiError::MalformedInput(format!("Invalid multipart payload: {}", err))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        error!("Request failed: {}", self);
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn validation_message_lists_every_missing_field() {
        let err = ApiError::Validation(vec!["first_name".into(), "email".into()]);
        assert_eq!(err.to_string(), "Missing required fields: first_name, email");
    }

    #[actix_web::test]
    async fn every_variant_becomes_a_500_with_error_body() {
        let errors = vec![
            ApiError::MissingUpload("No file uploaded".into()),
            ApiError::Datastore(DatastoreError::new("boom")),
        ];

        for err in errors {
            let expected = err.to_string();
            let response = err.error_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

            let body = to_bytes(response.into_body()).await.unwrap();
            let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
            assert_eq!(parsed.error, expected);
        }
    }
}
