//! CSV bulk-import pipeline.
//!
//! An import runs as one sequential flow:
//!
//! 1. `decoder` turns the uploaded bytes into rows keyed by header.
//! 2. `mapper` picks the mapped columns of each row into a candidate record.
//! 3. `coercer` converts dates, statuses, buyer preference and tags.
//! 4. `validator` checks the required fields. The first invalid record stops
//!    the import before anything is written.
//! 5. `batch_writer` inserts the records in fixed-size batches.
//!
//! There is no transaction across batches: when batch *k* fails, batches
//! before it remain in the datastore.

pub mod batch_writer;
pub mod coercer;
pub mod decoder;
pub mod mapper;
pub mod validator;

use crate::error::ApiResult;
use crate::store::ContactStore;
use common::model::contact::{Contact, ContactDraft};
use common::model::mapping::ColumnMapping;
use log::info;

pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Tunables for an import, loaded from configuration at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    pub batch_size: usize,
    /// Fail on unparseable dates instead of storing null.
    pub strict_dates: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            strict_dates: true,
        }
    }
}

/// Decodes, maps, coerces and validates every row of `csv`.
pub fn prepare_records(
    csv: &[u8],
    mapping: &ColumnMapping,
    settings: &ImportSettings,
) -> ApiResult<Vec<ContactDraft>> {
    let mut records = Vec::new();
    for row in decoder::decode(csv)? {
        let mut record = mapper::map_row(&row?, mapping);
        coercer::coerce(&mut record, settings.strict_dates)?;
        validator::validate(&record)?;
        records.push(record);
    }
    Ok(records)
}

/// Runs the whole pipeline and returns every persisted contact.
pub async fn import_contacts(
    store: &dyn ContactStore,
    csv: &[u8],
    mapping: &ColumnMapping,
    settings: &ImportSettings,
) -> ApiResult<Vec<Contact>> {
    let records = prepare_records(csv, mapping, settings)?;
    info!(
        "Importing {} contacts in batches of {}",
        records.len(),
        settings.batch_size
    );
    let imported = batch_writer::write_batches(store, records, settings.batch_size).await?;
    info!("Imported {} contacts", imported.len());
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::store::fake::FakeStore;

    fn full_mapping() -> ColumnMapping {
        ColumnMapping::new()
            .with("first_name", "Name")
            .with("last_name", "Surname")
            .with("email", "Mail")
    }

    fn csv_with_rows(count: usize) -> String {
        let mut csv = String::from("Name,Surname,Mail\n");
        for i in 0..count {
            csv.push_str(&format!("First{i},Last{i},{i}@x.com\n"));
        }
        csv
    }

    #[actix_web::test]
    async fn imports_every_row() {
        let store = FakeStore::default();

        let imported = import_contacts(
            &store,
            csv_with_rows(250).as_bytes(),
            &full_mapping(),
            &ImportSettings::default(),
        )
        .await
        .unwrap();

        assert_eq!(imported.len(), 250);
        assert_eq!(store.batch_sizes(), vec![100, 100, 50]);
    }

    #[actix_web::test]
    async fn missing_required_mapping_fails_before_any_write() {
        let store = FakeStore::default();
        let mapping = ColumnMapping::new()
            .with("first_name", "Name")
            .with("email", "Mail");

        let err = import_contacts(
            &store,
            csv_with_rows(5).as_bytes(),
            &mapping,
            &ImportSettings::default(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "Missing required fields: last_name");
        assert!(store.batch_sizes().is_empty());
    }

    #[test]
    fn first_invalid_row_halts_preparation() {
        let csv = "Name,Surname,Mail\nJane,Doe,j@x.com\n,Roe,\nBob,,b@x.com\n";

        let err = prepare_records(csv.as_bytes(), &full_mapping(), &ImportSettings::default())
            .unwrap_err();

        assert_eq!(err.to_string(), "Missing required fields: first_name, email");
    }

    #[test]
    fn malformed_csv_is_reported() {
        let csv = "Name,Surname,Mail\nJane,Doe\n";

        let err = prepare_records(csv.as_bytes(), &full_mapping(), &ImportSettings::default())
            .unwrap_err();

        assert!(matches!(err, ApiError::MalformedInput(_)));
    }

    #[actix_web::test]
    async fn custom_batch_size_is_honoured() {
        let store = FakeStore::default();
        let settings = ImportSettings {
            batch_size: 2,
            strict_dates: true,
        };

        import_contacts(&store, csv_with_rows(5).as_bytes(), &full_mapping(), &settings)
            .await
            .unwrap();

        assert_eq!(store.batch_sizes(), vec![2, 2, 1]);
    }
}
