use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EnrollmentService, enrollment_error};
use crate::models::enrollments::requests::UpdateEnrollmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found};
use crate::storage::{EnrollmentStorage, PackageStorage};

pub async fn update_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    body: UpdateEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    const ACTION: &str = "Failed to update enrollment";
    let storage = service.get_storage(request);

    let current = match storage.get_enrollment_by_id(enrollment_id).await {
        Ok(Some(enrollment)) => enrollment,
        Ok(None) => return Ok(not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found")),
        Err(e) => return Ok(error_response(&e, ACTION)),
    };

    let start = body.start_date.unwrap_or(current.start_date);
    let end = body.end_date.or(current.end_date);
    if end.is_some_and(|end| end < start) {
        return Ok(bad_request(
            ErrorCode::EnrollmentInvalid,
            "end_date must not be before start_date",
        ));
    }
    if let Some(package_id) = body.package_id {
        match storage.get_package_by_id(package_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(not_found(ErrorCode::PackageNotFound, "Package not found")),
            Err(e) => return Ok(error_response(&e, ACTION)),
        }
    }

    // 从暂停/结束恢复为 active 时重新占用名额，满员返回 409
    match storage.update_enrollment(enrollment_id, body).await {
        Ok(Some(enrollment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            enrollment,
            "Enrollment updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found")),
        Err(e) => Ok(enrollment_error(&e, ACTION)),
    }
}
