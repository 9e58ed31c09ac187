use crate::error::ApiResult;
use crate::store::ContactStore;
use common::model::contact::{Contact, ContactDraft};
use log::{debug, error};

/// Persists `records` in consecutive batches of `batch_size`, one insert per
/// batch, strictly in order.
///
/// The first failing batch aborts the run with its error. Batches written
/// before it stay persisted.
pub async fn write_batches(
    store: &dyn ContactStore,
    records: Vec<ContactDraft>,
    batch_size: usize,
) -> ApiResult<Vec<Contact>> {
    let batch_size = batch_size.max(1);
    let total_batches = records.len().div_ceil(batch_size);
    let mut persisted = Vec::with_capacity(records.len());

    for (index, batch) in records.chunks(batch_size).enumerate() {
        debug!(
            "Writing batch {}/{} ({} records)",
            index + 1,
            total_batches,
            batch.len()
        );
        let rows = store.insert(batch.to_vec()).await.map_err(|e| {
            error!(
                "Batch {}/{} failed after {} records were persisted",
                index + 1,
                total_batches,
                persisted.len()
            );
            e
        })?;
        persisted.extend(rows);
    }

    Ok(persisted)
}
