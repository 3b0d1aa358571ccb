use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::models::teachers::requests::UpdateTeacherRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found};
use crate::storage::TeacherStorage;
use crate::utils::validate::{
    normalize_email, validate_email, validate_name, validate_phone, validate_rate,
};

pub async fn update_teacher(
    service: &TeacherService,
    teacher_id: i64,
    mut body: UpdateTeacherRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = body.name.take() {
        if let Err(msg) = validate_name(&name) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        body.name = Some(name.trim().to_string());
    }
    if let Some(rate) = body.rate
        && let Err(msg) = validate_rate(rate)
    {
        return Ok(bad_request(ErrorCode::TeacherRateInvalid, msg));
    }
    if let Some(email) = body.email.take() {
        let email = normalize_email(&email);
        if let Err(msg) = validate_email(&email) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        body.email = Some(email);
    }
    if let Some(phone) = body.phone.as_deref()
        && let Err(msg) = validate_phone(phone)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);
    match storage.update_teacher(teacher_id, body).await {
        Ok(Some(teacher)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            teacher,
            "Teacher updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => Ok(error_response(&e, "Failed to update teacher")),
    }
}
