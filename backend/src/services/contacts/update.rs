use crate::error::ApiResult;
use crate::store::ContactStore;
use actix_web::{web, HttpResponse};
use common::model::contact::ContactDraft;

/// `PUT /api/contacts/{id}`: applies any subset of fields to one contact.
///
/// An unknown id surfaces as a datastore error, not a 404.
pub async fn process(
    store: web::Data<dyn ContactStore>,
    id: web::Path<String>,
    payload: web::Json<ContactDraft>,
) -> ApiResult<HttpResponse> {
    let updated = store.update(&id, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}
