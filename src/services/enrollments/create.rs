use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EnrollmentService, dedup_batch_ids, enrollment_error, validate_batches};
use crate::config::AppConfig;
use crate::models::enrollments::requests::{CreateEnrollmentRequest, NewEnrollment};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found};
use crate::storage::{EnrollmentStorage, InstrumentStorage, PackageStorage, StudentStorage};

/// 报名与班次关联在同一事务中写入，任一班次满员则整体失败
pub async fn create_enrollment(
    service: &EnrollmentService,
    body: CreateEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    const ACTION: &str = "Enrollment creation failed";

    let start_date = body
        .start_date
        .unwrap_or_else(|| AppConfig::get().school_today());
    if body.end_date.is_some_and(|end| end < start_date) {
        return Ok(bad_request(
            ErrorCode::EnrollmentInvalid,
            "end_date must not be before start_date",
        ));
    }
    let batch_ids = dedup_batch_ids(&body.batch_ids);

    let storage = service.get_storage(request);

    match storage.get_student_by_id(body.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(error_response(&e, ACTION)),
    }
    match storage.get_instrument_by_id(body.instrument_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::InstrumentNotFound, "Instrument not found")),
        Err(e) => return Ok(error_response(&e, ACTION)),
    }
    if let Some(package_id) = body.package_id {
        match storage.get_package_by_id(package_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(not_found(ErrorCode::PackageNotFound, "Package not found")),
            Err(e) => return Ok(error_response(&e, ACTION)),
        }
    }
    if let Err(response) =
        validate_batches(storage.as_ref(), &batch_ids, body.instrument_id, ACTION).await
    {
        return Ok(response);
    }

    let enrollment = NewEnrollment {
        student_id: body.student_id,
        instrument_id: body.instrument_id,
        package_id: body.package_id,
        start_date,
        end_date: body.end_date,
        batch_ids,
    };

    match storage.create_enrollment(enrollment).await {
        Ok(enrollment) => {
            info!(
                "Enrollment {} created for student {} in batches {:?}",
                enrollment.id, enrollment.student_id, enrollment.batch_ids
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                enrollment,
                "Enrollment created successfully",
            )))
        }
        Err(e) => Ok(enrollment_error(&e, ACTION)),
    }
}
