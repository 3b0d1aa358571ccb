use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::enrollments::responses::EnrollmentDetailResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::credits::enrollment_credits;
use crate::services::{error_response, not_found};
use crate::storage::{BatchStorage, EnrollmentStorage};

pub async fn get_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let enrollment = match storage.get_enrollment_by_id(enrollment_id).await {
        Ok(Some(enrollment)) => enrollment,
        Ok(None) => return Ok(not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found")),
        Err(e) => return Ok(error_response(&e, "Failed to get enrollment")),
    };
    let batches = match storage.get_batches_by_ids(&enrollment.batch_ids).await {
        Ok(batches) => batches,
        Err(e) => return Ok(error_response(&e, "Failed to get enrollment")),
    };
    let credits = match enrollment_credits(storage.as_ref(), &enrollment).await {
        Ok(credits) => credits,
        Err(e) => return Ok(error_response(&e, "Failed to get enrollment")),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        EnrollmentDetailResponse {
            enrollment,
            batches,
            credits,
        },
        "Enrollment retrieved successfully",
    )))
}
