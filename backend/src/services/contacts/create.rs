use crate::error::ApiResult;
use crate::store::{ContactStore, DatastoreError};
use actix_web::{web, HttpResponse};
use common::model::contact::ContactDraft;

/// `POST /api/contacts`: inserts one contact and returns the stored row,
/// datastore defaults included. Required fields are enforced by the datastore.
pub async fn process(
    store: web::Data<dyn ContactStore>,
    payload: web::Json<ContactDraft>,
) -> ApiResult<HttpResponse> {
    let created = store
        .insert(vec![payload.into_inner()])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| DatastoreError::new("Insert returned no rows"))?;
    Ok(HttpResponse::Ok().json(created))
}
