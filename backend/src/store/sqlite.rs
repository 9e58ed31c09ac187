//! Local contacts table backed by SQLite.
//!
//! The table is created on open. Column defaults and checks mirror what the
//! managed datastore enforces: statuses default to `pending`, the buyer
//! preference to `email`, tags to an empty list, and the three required
//! columns must be non-empty. `rusqlite` is synchronous, so every call runs on
//! the blocking pool behind a single shared connection.

use super::{ContactStore, DatastoreError};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use common::model::contact::{Contact, ContactDraft, TAGS};
use log::debug;
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS contacts (
    id                        TEXT PRIMARY KEY,
    created_at                TEXT NOT NULL,
    first_name                TEXT NOT NULL CHECK (first_name <> ''),
    last_name                 TEXT NOT NULL CHECK (last_name <> ''),
    email                     TEXT NOT NULL CHECK (email <> ''),
    phone                     TEXT,
    company                   TEXT,
    job_title                 TEXT,
    city                      TEXT,
    country                   TEXT,
    notes                     TEXT,
    subscription_date         TEXT,
    unsubscription_date       TEXT,
    birthday                  TEXT,
    latest_interaction        TEXT,
    subscription_status_email TEXT NOT NULL DEFAULT 'pending',
    subscription_status_sms   TEXT NOT NULL DEFAULT 'pending',
    buyer_preference          TEXT NOT NULL DEFAULT 'email',
    tags                      TEXT NOT NULL DEFAULT '[]'
);
CREATE INDEX IF NOT EXISTS contacts_created_at ON contacts (created_at);
";

const SELECT_COLUMNS: &str = "id, created_at, first_name, last_name, email, phone, company, \
     job_title, city, country, notes, subscription_date, unsubscription_date, birthday, \
     latest_interaction, subscription_status_email, subscription_status_sms, \
     buyer_preference, tags";

/// Columns a draft may set. `id` and `created_at` are assigned here.
const WRITABLE_COLUMNS: [&str; 17] = [
    "first_name",
    "last_name",
    "email",
    "phone",
    "company",
    "job_title",
    "city",
    "country",
    "notes",
    "subscription_date",
    "unsubscription_date",
    "birthday",
    "latest_interaction",
    "subscription_status_email",
    "subscription_status_sms",
    "buyer_preference",
    "tags",
];

const READ_ONLY_COLUMNS: [&str; 2] = ["id", "created_at"];

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatastoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, DatastoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatastoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, DatastoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, DatastoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| DatastoreError::new("SQLite connection lock poisoned"))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| DatastoreError::new(format!("join error: {}", e)))?
    }
}

#[async_trait]
impl ContactStore for SqliteStore {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    async fn list(&self) -> Result<Vec<Contact>, DatastoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM contacts ORDER BY created_at DESC, rowid DESC",
                SELECT_COLUMNS
            ))?;
            let contacts = stmt
                .query_map([], row_to_contact)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(contacts)
        })
        .await
    }

    async fn insert(&self, rows: Vec<ContactDraft>) -> Result<Vec<Contact>, DatastoreError> {
        self.with_conn(move |conn| insert_rows(conn, rows)).await
    }

    async fn update(&self, id: &str, changes: ContactDraft) -> Result<Contact, DatastoreError> {
        let id = id.to_string();
        self.with_conn(move |conn| update_row(conn, &id, changes))
            .await
    }

    async fn delete(&self, id: &str) -> Result<(), DatastoreError> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let deleted = conn.execute("DELETE FROM contacts WHERE id = ?1", params![id])?;
            if deleted == 0 {
                return Err(DatastoreError::not_found(&id));
            }
            Ok(())
        })
        .await
    }
}

/// Inserts every row inside one transaction so a batch lands all-or-nothing.
fn insert_rows(conn: &mut Connection, rows: Vec<ContactDraft>) -> Result<Vec<Contact>, DatastoreError> {
    let tx = conn.transaction()?;
    let mut ids = Vec::with_capacity(rows.len());

    for row in rows {
        let id = Uuid::new_v4().to_string();
        let mut columns = vec!["id", "created_at"];
        let mut values = vec![SqlValue::Text(id.clone()), SqlValue::Text(now_timestamp())];

        for (field, value) in row.fields() {
            if let Some(column) = writable_column(field)? {
                columns.push(column);
                values.push(to_sql_value(column, value)?);
            }
        }

        let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO contacts ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        );
        tx.execute(&sql, params_from_iter(values.iter()))?;
        ids.push(id);
    }

    let mut contacts = Vec::with_capacity(ids.len());
    for id in &ids {
        contacts.push(fetch_contact(&tx, id)?.ok_or_else(|| DatastoreError::not_found(id))?);
    }
    tx.commit()?;
    Ok(contacts)
}

fn update_row(conn: &mut Connection, id: &str, changes: ContactDraft) -> Result<Contact, DatastoreError> {
    let mut assignments = Vec::new();
    let mut values = Vec::new();

    for (field, value) in changes.fields() {
        if let Some(column) = writable_column(field)? {
            values.push(to_sql_value(column, value)?);
            assignments.push(format!("{} = ?{}", column, values.len()));
        }
    }

    if !assignments.is_empty() {
        values.push(SqlValue::Text(id.to_string()));
        let sql = format!(
            "UPDATE contacts SET {} WHERE id = ?{}",
            assignments.join(", "),
            values.len()
        );
        if conn.execute(&sql, params_from_iter(values.iter()))? == 0 {
            return Err(DatastoreError::not_found(id));
        }
    }

    fetch_contact(conn, id)?.ok_or_else(|| DatastoreError::not_found(id))
}

fn fetch_contact(conn: &Connection, id: &str) -> Result<Option<Contact>, DatastoreError> {
    let contact = conn
        .query_row(
            &format!("SELECT {} FROM contacts WHERE id = ?1", SELECT_COLUMNS),
            params![id],
            row_to_contact,
        )
        .optional()?;
    Ok(contact)
}

/// Resolves a draft field to its column. Read-only columns are skipped,
/// anything else unknown is rejected the way a strict schema would.
fn writable_column(field: &str) -> Result<Option<&'static str>, DatastoreError> {
    if READ_ONLY_COLUMNS.contains(&field) {
        debug!("Ignoring read-only column '{}'", field);
        return Ok(None);
    }
    WRITABLE_COLUMNS
        .iter()
        .find(|column| **column == field)
        .map(|column| Some(*column))
        .ok_or_else(|| {
            DatastoreError::new(format!(
                "Could not find the '{}' column of 'contacts'",
                field
            ))
        })
}

fn to_sql_value(column: &str, value: &Value) -> Result<SqlValue, DatastoreError> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::String(s) if column != TAGS => Ok(SqlValue::Text(s.clone())),
        Value::Number(n) if column != TAGS => Ok(SqlValue::Text(n.to_string())),
        Value::Bool(b) if column != TAGS => Ok(SqlValue::Text(b.to_string())),
        Value::Array(items) if column == TAGS => {
            if items.iter().all(Value::is_string) {
                Ok(SqlValue::Text(value.to_string()))
            } else {
                Err(DatastoreError::new("tags must be a list of strings"))
            }
        }
        _ if column == TAGS => Err(DatastoreError::new("tags must be a list of strings")),
        _ => Err(DatastoreError::new(format!(
            "Invalid value for column '{}': expected text",
            column
        ))),
    }
}

fn now_timestamp() -> String {
    // Fixed width keeps lexicographic order equal to chronological order.
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_failure<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn row_to_contact(row: &Row<'_>) -> rusqlite::Result<Contact> {
    let created_at: String = row.get(1)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| conversion_failure(1, e))?
        .with_timezone(&Utc);
    let tags: String = row.get(18)?;
    let tags: Vec<String> = serde_json::from_str(&tags).map_err(|e| conversion_failure(18, e))?;

    Ok(Contact {
        id: row.get(0)?,
        created_at,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        company: row.get(6)?,
        job_title: row.get(7)?,
        city: row.get(8)?,
        country: row.get(9)?,
        notes: row.get(10)?,
        subscription_date: row.get(11)?,
        unsubscription_date: row.get(12)?,
        birthday: row.get(13)?,
        latest_interaction: row.get(14)?,
        subscription_status_email: row.get(15)?,
        subscription_status_sms: row.get(16)?,
        buyer_preference: row.get(17)?,
        tags,
        extra: Map::new(),
    })
}
