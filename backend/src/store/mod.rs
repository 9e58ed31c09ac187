//! Persistence boundary for contacts.
//!
//! The service never owns contact state: every operation is delegated to a
//! `ContactStore`. One store is built at startup from `AppConfig` and shared
//! with all handlers as `web::Data<dyn ContactStore>`, so tests can swap in an
//! in-memory SQLite store or the recording `FakeStore`.
//!
//! Backends:
//! - `sqlite`: local file (or in-memory) database through `rusqlite`.
//! - `postgrest`: a managed Supabase/PostgREST `contacts` table over HTTP.

use async_trait::async_trait;
use common::model::contact::{Contact, ContactDraft};
use thiserror::Error;

#[cfg(test)]
pub mod fake;
pub mod postgrest;
pub mod sqlite;

/// Failure reported by a datastore, carried as a plain message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DatastoreError {
    pub message: String,
}

impl DatastoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn not_found(id: &str) -> Self {
        Self::new(format!("No contact found with id {}", id))
    }
}

impl From<rusqlite::Error> for DatastoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<reqwest::Error> for DatastoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Operations the HTTP layer and the import pipeline need from a datastore.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Short name used in startup logs.
    fn backend_tag(&self) -> &'static str;

    /// All contacts, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Contact>, DatastoreError>;

    /// Inserts `rows` in a single call and returns the persisted rows, in
    /// input order, with datastore-assigned ids and defaults filled in.
    async fn insert(&self, rows: Vec<ContactDraft>) -> Result<Vec<Contact>, DatastoreError>;

    /// Applies `changes` to the contact `id` and returns the updated row.
    async fn update(&self, id: &str, changes: ContactDraft) -> Result<Contact, DatastoreError>;

    /// Removes the contact `id`. Unknown ids are an error.
    async fn delete(&self, id: &str) -> Result<(), DatastoreError>;
}
