use crate::model::contact::Contact;
use serde::{Deserialize, Serialize};

/// Body of every failed API call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body returned by operations that have nothing else to report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Result of `POST /api/contacts/import`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub message: String,
    pub imported: Vec<Contact>,
}

impl ImportResponse {
    pub fn new(imported: Vec<Contact>) -> Self {
        Self {
            message: format!("Successfully imported {} contacts", imported.len()),
            imported,
        }
    }
}
