use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::BatchService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, is_foreign_key_violation, not_found};
use crate::storage::BatchStorage;

pub async fn delete_batch(
    service: &BatchService,
    batch_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_batch(batch_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Batch deleted successfully"))),
        Ok(false) => Ok(not_found(ErrorCode::BatchNotFound, "Batch not found")),
        // 有出勤记录的班次只能归档
        Err(e) if is_foreign_key_violation(&e) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::Conflict,
                "Batch has attendance history, archive it instead",
            ),
        )),
        Err(e) => Ok(error_response(&e, "Failed to delete batch")),
    }
}
