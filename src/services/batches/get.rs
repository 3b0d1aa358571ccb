use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{BatchService, load_accessible_batch};
use crate::models::ApiResponse;
use crate::services::{current_user, unauthorized};

pub async fn get_batch(
    service: &BatchService,
    batch_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = current_user(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request);

    match load_accessible_batch(storage.as_ref(), &user, batch_id, "Failed to get batch").await {
        Ok(batch) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            batch,
            "Batch information retrieved successfully",
        ))),
        Err(response) => Ok(response),
    }
}
