//! # Contacts Service Module
//!
//! Aggregates the HTTP endpoints for the `contacts` table under
//! `/api/contacts`. Handlers are stateless: each one receives the shared
//! `ContactStore` (and, for imports, the `ImportSettings`) as application data
//! and delegates straight to it.
//!
//! ## Sub-modules:
//! - `list`: all contacts, newest first.
//! - `create`: inserts one contact.
//! - `update`: partial update of one contact by id.
//! - `delete`: removes one contact by id.
//! - `import`: bulk CSV import with a column mapping.

mod create;
mod delete;
mod import;
mod list;
mod update;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

/// The base path for all contact endpoints.
const API_PATH: &str = "/api/contacts";

/// Configures and returns the Actix `Scope` for the contact routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        // Registered before `/{id}` so the literal segment wins.
        .route("/import", post().to(import::process))
        .route("/{id}", put().to(update::process))
        .route("/{id}", delete().to(delete::process))
}
