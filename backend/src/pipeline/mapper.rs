use super::decoder::CsvRow;
use common::model::contact::ContactDraft;
use common::model::mapping::ColumnMapping;
use serde_json::Value;

/// Builds the raw candidate record for one row.
///
/// Each mapped field receives the row's string for its source column, empty
/// strings included. Fields whose column is unmapped or absent from the row
/// stay unset; required-field checks happen later.
pub fn map_row(row: &CsvRow, mapping: &ColumnMapping) -> ContactDraft {
    mapping
        .entries()
        .filter_map(|(field, column)| {
            row.get(column)
                .map(|value| (field.to_string(), Value::String(value.clone())))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, &str)]) -> CsvRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn copies_raw_values_for_mapped_columns() {
        let mapping = ColumnMapping::new()
            .with("first_name", "Name")
            .with("email", "Mail");
        let draft = map_row(&row(&[("Name", "Jane"), ("Mail", "j@x.com"), ("Age", "40")]), &mapping);

        assert_eq!(draft.len(), 2);
        assert_eq!(draft.get("first_name"), Some(&json!("Jane")));
        assert_eq!(draft.get("email"), Some(&json!("j@x.com")));
    }

    #[test]
    fn empty_cells_are_present_but_missing_columns_are_not() {
        let mapping = ColumnMapping::new()
            .with("first_name", "Name")
            .with("last_name", "Surname");
        let draft = map_row(&row(&[("Name", "")]), &mapping);

        assert_eq!(draft.get("first_name"), Some(&json!("")));
        assert!(!draft.contains("last_name"));
    }

    #[test]
    fn unmapped_entries_are_skipped() {
        let mapping: ColumnMapping =
            serde_json::from_value(json!({"first_name": "", "email": null})).unwrap();
        let draft = map_row(&row(&[("", "x"), ("Mail", "j@x.com")]), &mapping);

        assert!(draft.is_empty());
    }
}
