use crate::error::ApiResult;
use crate::store::ContactStore;
use actix_web::{web, HttpResponse};

/// `GET /api/contacts`: every contact, newest first.
pub async fn process(store: web::Data<dyn ContactStore>) -> ApiResult<HttpResponse> {
    let contacts = store.list().await?;
    Ok(HttpResponse::Ok().json(contacts))
}
