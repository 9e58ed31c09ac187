use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// User-declared correspondence between contact fields and CSV headers.
///
/// Keys are target contact field names, values the source column in the
/// uploaded file. A source that is not a non-empty string (`null`, `""`, a
/// number) means the field is not mapped.
/// Sent by the client as the `mapping` part of an import request; never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping(BTreeMap<String, Value>);

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.0.insert(field.into(), Value::String(column.into()));
        self
    }

    /// Mapped `(field, column)` pairs, skipping entries without a usable source column.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().filter_map(|(field, column)| match column {
            Value::String(column) if !column.is_empty() => Some((field.as_str(), column.as_str())),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_skip_null_and_empty_sources() {
        let mapping: ColumnMapping = serde_json::from_str(
            r#"{"first_name":"Name","last_name":"","email":null,"tags":"Labels"}"#,
        )
        .unwrap();

        let entries: Vec<_> = mapping.entries().collect();
        assert_eq!(entries, vec![("first_name", "Name"), ("tags", "Labels")]);
        assert_eq!(mapping.len(), 4);
    }

    #[test]
    fn non_string_sources_are_unmapped() {
        let mapping: ColumnMapping = serde_json::from_str(
            r#"{"first_name":"Name","phone":5,"tags":["Labels"],"notes":true}"#,
        )
        .unwrap();

        let entries: Vec<_> = mapping.entries().collect();
        assert_eq!(entries, vec![("first_name", "Name")]);
    }
}
