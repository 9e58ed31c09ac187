//! # Contact Import Service
//!
//! Backend logic for `POST /api/contacts/import`.
//!
//! ## Workflow
//!
//! 1.  **Multipart Read**: `read_upload` walks the form parts. The `file`
//!     part must be declared as `text/csv`; anything else is refused before a
//!     single byte reaches the CSV decoder. The `mapping` part carries a JSON
//!     object of contact field to CSV column.
//!
//! 2.  **Pipeline**: the CSV bytes and the mapping go through
//!     `pipeline::import_contacts` (decode, map, coerce, validate, batch write).
//!
//! 3.  **HTTP Response**: `200 OK` with the imported contacts and a summary
//!     message. Any failure along the way becomes the uniform
//!     `500 {"error": ...}` response.

use crate::error::{ApiError, ApiResult};
use crate::pipeline::{self, ImportSettings};
use crate::store::ContactStore;
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use common::model::mapping::ColumnMapping;
use common::responses::ImportResponse;
use futures_util::StreamExt;

const CSV_MIME: &str = "text/csv";

/// A fully read import form.
struct ImportUpload {
    csv: Vec<u8>,
    mapping: ColumnMapping,
}

pub async fn process(
    store: web::Data<dyn ContactStore>,
    settings: web::Data<ImportSettings>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let upload = read_upload(payload).await?;
    let imported =
        pipeline::import_contacts(store.get_ref(), &upload.csv, &upload.mapping, &settings)
            .await?;
    Ok(HttpResponse::Ok().json(ImportResponse::new(imported)))
}

/// Collects the `file` and `mapping` parts. Unknown parts are skipped.
async fn read_upload(mut payload: Multipart) -> ApiResult<ImportUpload> {
    let mut csv: Option<Vec<u8>> = None;
    let mut mapping: Option<String> = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match name.as_deref() {
            Some("file") => {
                if !is_csv(&field) {
                    return Err(ApiError::RejectedUpload(
                        "Only CSV files are allowed".to_string(),
                    ));
                }
                csv = Some(read_field(&mut field).await?);
            }
            Some("mapping") => {
                let bytes = read_field(&mut field).await?;
                let text = String::from_utf8(bytes).map_err(|_| {
                    ApiError::MalformedInput("Column mapping is not valid UTF-8".to_string())
                })?;
                mapping = Some(text);
            }
            _ => {}
        }
    }

    let csv = csv.ok_or_else(|| ApiError::MissingUpload("No file uploaded".to_string()))?;
    let mapping = mapping
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::MissingUpload("Column mapping is required".to_string()))?;
    let mapping: ColumnMapping = serde_json::from_str(&mapping)
        .map_err(|e| ApiError::MalformedInput(format!("Invalid column mapping: {}", e)))?;

    Ok(ImportUpload { csv, mapping })
}

fn is_csv(field: &Field) -> bool {
    field
        .content_type()
        .map(|mime| mime.essence_str() == CSV_MIME)
        .unwrap_or(false)
}

async fn read_field(field: &mut Field) -> ApiResult<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        bytes.extend_from_slice(&chunk?);
    }
    Ok(bytes)
}
