use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EnrollmentService, dedup_batch_ids, enrollment_error, validate_batches};
use crate::models::enrollments::requests::ReplaceBatchesRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, not_found};
use crate::storage::EnrollmentStorage;

/// 整体替换报名关联的班次（单事务）
pub async fn replace_batches(
    service: &EnrollmentService,
    enrollment_id: i64,
    body: ReplaceBatchesRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    const ACTION: &str = "Failed to replace enrollment batches";
    let storage = service.get_storage(request);

    let enrollment = match storage.get_enrollment_by_id(enrollment_id).await {
        Ok(Some(enrollment)) => enrollment,
        Ok(None) => return Ok(not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found")),
        Err(e) => return Ok(error_response(&e, ACTION)),
    };

    let batch_ids = dedup_batch_ids(&body.batch_ids);
    if let Err(response) =
        validate_batches(storage.as_ref(), &batch_ids, enrollment.instrument_id, ACTION).await
    {
        return Ok(response);
    }

    match storage.replace_enrollment_batches(enrollment.id, batch_ids).await {
        Ok(Some(enrollment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            enrollment,
            "Enrollment batches updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found")),
        Err(e) => Ok(enrollment_error(&e, ACTION)),
    }
}
