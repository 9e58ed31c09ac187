pub mod contacts;

use crate::error::ApiError;
use actix_web::web;

/// Request bodies larger than this are refused.
const JSON_LIMIT: usize = 10 * 1024 * 1024; // 10 MB

/// JSON extractor settings shared by all routes. Body errors go through the
/// same `ApiError` boundary as everything else.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            ApiError::MalformedInput(format!("Invalid JSON body: {}", err)).into()
        })
}
