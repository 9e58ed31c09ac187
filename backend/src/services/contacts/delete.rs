use crate::error::ApiResult;
use crate::store::ContactStore;
use actix_web::{web, HttpResponse};
use common::responses::MessageResponse;

pub async fn process(
    store: web::Data<dyn ContactStore>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    store.delete(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Contact deleted successfully".to_string(),
    }))
}
