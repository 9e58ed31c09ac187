use crate::error::{ApiError, ApiResult};
use common::model::contact::{ContactDraft, REQUIRED_FIELDS};

/// Rejects a record lacking any required field, naming all of them at once.
pub fn validate(draft: &ContactDraft) -> ApiResult<()> {
    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| draft.is_missing(field))
        .map(|field| field.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(missing))
    }
}
