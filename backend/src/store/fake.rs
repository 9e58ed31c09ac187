use super::{ContactStore, DatastoreError};
use async_trait::async_trait;
use chrono::Utc;
use common::model::contact::{Contact, ContactDraft};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory store that records every insert call.
///
/// `fail_on_insert_call` makes the n-th insert call (1-based) fail, which is
/// how batch abort behavior is exercised.
#[derive(Default)]
pub struct FakeStore {
    pub rows: Mutex<Vec<Contact>>,
    pub insert_batches: Mutex<Vec<usize>>,
    pub fail_on_insert_call: Option<usize>,
    next_id: AtomicUsize,
}

impl FakeStore {
    pub fn failing_on_insert_call(call: usize) -> Self {
        Self {
            fail_on_insert_call: Some(call),
            ..Self::default()
        }
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.insert_batches.lock().unwrap().clone()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn materialize(&self, draft: ContactDraft) -> Result<Contact, DatastoreError> {
        let mut object = draft.into_inner();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        object.insert("id".into(), json!(id.to_string()));
        object.insert("created_at".into(), json!(Utc::now()));
        serde_json::from_value(Value::Object(object))
            .map_err(|e| DatastoreError::new(e.to_string()))
    }
}

#[async_trait]
impl ContactStore for FakeStore {
    fn backend_tag(&self) -> &'static str {
        "fake"
    }

    async fn list(&self) -> Result<Vec<Contact>, DatastoreError> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.reverse();
        Ok(rows)
    }

    async fn insert(&self, rows: Vec<ContactDraft>) -> Result<Vec<Contact>, DatastoreError> {
        let call = {
            let mut batches = self.insert_batches.lock().unwrap();
            batches.push(rows.len());
            batches.len()
        };
        if self.fail_on_insert_call == Some(call) {
            return Err(DatastoreError::new(format!("insert call {} rejected", call)));
        }

        let contacts = rows
            .into_iter()
            .map(|draft| self.materialize(draft))
            .collect::<Result<Vec<_>, _>>()?;
        self.rows.lock().unwrap().extend(contacts.iter().cloned());
        Ok(contacts)
    }

    async fn update(&self, id: &str, changes: ContactDraft) -> Result<Contact, DatastoreError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DatastoreError::not_found(id))?;

        let mut object = match serde_json::to_value(&*row) {
            Ok(Value::Object(object)) => object,
            _ => return Err(DatastoreError::new("contact is not an object")),
        };
        for (field, value) in changes.into_inner() {
            object.insert(field, value);
        }
        *row = serde_json::from_value(Value::Object(object))
            .map_err(|e| DatastoreError::new(e.to_string()))?;
        Ok(row.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), DatastoreError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id != id);
        if rows.len() == before {
            return Err(DatastoreError::not_found(id));
        }
        Ok(())
    }
}
