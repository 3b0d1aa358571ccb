use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{BatchService, capacity_invalid};
use crate::models::batches::requests::CreateBatchRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found};
use crate::storage::{BatchStorage, InstrumentStorage, TeacherStorage};
use crate::utils::recurrence::normalize_recurrence;
use crate::utils::validate::validate_name;

pub async fn create_batch(
    service: &BatchService,
    mut body: CreateBatchRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_name(&body.name) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    body.name = body.name.trim().to_string();
    if body.capacity <= 0 {
        return Ok(capacity_invalid());
    }
    body.recurrence = match normalize_recurrence(&body.recurrence) {
        Ok(r) => r,
        Err(msg) => return Ok(bad_request(ErrorCode::BatchRecurrenceInvalid, msg)),
    };

    let storage = service.get_storage(request);

    match storage.get_instrument_by_id(body.instrument_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::InstrumentNotFound, "Instrument not found")),
        Err(e) => return Ok(error_response(&e, "Batch creation failed")),
    }
    match storage.get_teacher_by_id(body.teacher_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => return Ok(error_response(&e, "Batch creation failed")),
    }

    match storage.create_batch(body).await {
        Ok(batch) => {
            info!("Batch {} created for teacher {}", batch.id, batch.teacher_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(batch, "Batch created successfully")))
        }
        Err(e) => Ok(error_response(&e, "Batch creation failed")),
    }
}
