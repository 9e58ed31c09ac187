//! Managed contacts table reached through a Supabase/PostgREST endpoint.

use super::{ContactStore, DatastoreError};
use async_trait::async_trait;
use common::model::contact::{Contact, ContactDraft};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::Deserialize;

const TABLE: &str = "contacts";

pub struct PostgrestStore {
    client: Client,
    table_url: String,
}

/// Error body PostgREST sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

impl PostgrestStore {
    /// `base_url` is the project URL (`https://<ref>.supabase.co`); the
    /// service key is sent both as `apikey` and as bearer token.
    pub fn new(base_url: &str, service_key: &str) -> Result<Self, DatastoreError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(service_key)
            .map_err(|_| DatastoreError::new("Service key is not a valid header value"))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", service_key))
            .map_err(|_| DatastoreError::new("Service key is not a valid header value"))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            table_url: table_url(base_url),
        })
    }

    fn id_filter(id: &str) -> [(&'static str, String); 1] {
        [("id", format!("eq.{}", id))]
    }
}

fn table_url(base_url: &str) -> String {
    format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), TABLE)
}

/// Turns an error body into the message surfaced to API callers.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<PostgrestErrorBody>(body) {
        Ok(PostgrestErrorBody {
            message: Some(message),
            details,
            hint,
        }) => {
            let mut text = message;
            if let Some(details) = details.filter(|d| !d.is_empty()) {
                text.push_str(&format!(" ({})", details));
            }
            if let Some(hint) = hint.filter(|h| !h.is_empty()) {
                text.push_str(&format!(" Hint: {}", hint));
            }
            text
        }
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => format!("Datastore request failed with status {}", status),
    }
}

async fn read_rows(response: Response) -> Result<Vec<Contact>, DatastoreError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(DatastoreError::new(error_message(status, &body)));
    }
    Ok(response.json::<Vec<Contact>>().await?)
}

#[async_trait]
impl ContactStore for PostgrestStore {
    fn backend_tag(&self) -> &'static str {
        "postgrest"
    }

    async fn list(&self) -> Result<Vec<Contact>, DatastoreError> {
        let response = self
            .client
            .get(&self.table_url)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;
        read_rows(response).await
    }

    async fn insert(&self, rows: Vec<ContactDraft>) -> Result<Vec<Contact>, DatastoreError> {
        let response = self
            .client
            .post(&self.table_url)
            .query(&[("select", "*")])
            .json(&rows)
            .send()
            .await?;
        read_rows(response).await
    }

    async fn update(&self, id: &str, changes: ContactDraft) -> Result<Contact, DatastoreError> {
        let response = self
            .client
            .patch(&self.table_url)
            .query(&Self::id_filter(id))
            .query(&[("select", "*")])
            .json(&changes)
            .send()
            .await?;
        read_rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DatastoreError::not_found(id))
    }

    async fn delete(&self, id: &str) -> Result<(), DatastoreError> {
        let response = self
            .client
            .delete(&self.table_url)
            .query(&Self::id_filter(id))
            .send()
            .await?;
        if read_rows(response).await?.is_empty() {
            return Err(DatastoreError::not_found(id));
        }
        Ok(())
    }
}
