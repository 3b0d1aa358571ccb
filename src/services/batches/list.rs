use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::BatchService;
use crate::models::batches::requests::{BatchListParams, BatchListQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response, forbidden, unauthorized};
use crate::storage::BatchStorage;

pub async fn list_batches(
    service: &BatchService,
    query: BatchListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = current_user(request) else {
        return Ok(unauthorized());
    };

    // 教师只能看到自己的班次，忽略传入的 teacher_id
    let teacher_id = if user.is_office() {
        query.teacher_id
    } else {
        match user.teacher_id {
            Some(id) => Some(id),
            None => {
                return Ok(forbidden(
                    ErrorCode::BatchPermissionDenied,
                    "No teacher profile is linked to this account",
                ));
            }
        }
    };

    let storage = service.get_storage(request);
    let list_query = BatchListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        teacher_id,
        instrument_id: query.instrument_id,
        status: query.status,
    };

    match storage.list_batches_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Batch list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to retrieve batch list")),
    }
}
