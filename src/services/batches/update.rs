use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{BatchService, capacity_invalid};
use crate::models::batches::requests::UpdateBatchRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found};
use crate::storage::{BatchStorage, InstrumentStorage, TeacherStorage};
use crate::utils::recurrence::normalize_recurrence;
use crate::utils::validate::validate_name;

pub async fn update_batch(
    service: &BatchService,
    batch_id: i64,
    mut body: UpdateBatchRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = body.name.take() {
        if let Err(msg) = validate_name(&name) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        body.name = Some(name.trim().to_string());
    }
    if body.capacity.is_some_and(|c| c <= 0) {
        return Ok(capacity_invalid());
    }
    if let Some(recurrence) = body.recurrence.take() {
        match normalize_recurrence(&recurrence) {
            Ok(r) => body.recurrence = Some(r),
            Err(msg) => return Ok(bad_request(ErrorCode::BatchRecurrenceInvalid, msg)),
        }
    }

    let storage = service.get_storage(request);

    if let Some(instrument_id) = body.instrument_id {
        match storage.get_instrument_by_id(instrument_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(not_found(ErrorCode::InstrumentNotFound, "Instrument not found"));
            }
            Err(e) => return Ok(error_response(&e, "Failed to update batch")),
        }
    }
    if let Some(teacher_id) = body.teacher_id {
        match storage.get_teacher_by_id(teacher_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
            Err(e) => return Ok(error_response(&e, "Failed to update batch")),
        }
    }
    // 容量不能低于现有在读人数
    if let Some(capacity) = body.capacity {
        match storage.count_batch_active_enrollments(batch_id).await {
            Ok(seated) if seated > capacity as i64 => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::BatchCapacityExceeded,
                    format!("Batch already has {seated} enrolled students"),
                )));
            }
            Ok(_) => {}
            Err(e) => return Ok(error_response(&e, "Failed to update batch")),
        }
    }

    match storage.update_batch(batch_id, body).await {
        Ok(Some(batch)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            batch,
            "Batch updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::BatchNotFound, "Batch not found")),
        Err(e) => Ok(error_response(&e, "Failed to update batch")),
    }
}
