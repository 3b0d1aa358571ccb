use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, load_student};
use crate::models::students::requests::CreateGuardianRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found};
use crate::storage::StudentStorage;
use crate::utils::validate::{normalize_email, validate_email, validate_name, validate_phone};

pub async fn list_guardians(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(response) = load_student(storage.as_ref(), student_id, "Failed to list guardians").await {
        return Ok(response);
    }

    match storage.list_guardians(student_id).await {
        Ok(guardians) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            guardians,
            "Guardians retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to list guardians")),
    }
}

/// 设为主要监护人时，其他监护人的主要标记被清除
pub async fn create_guardian(
    service: &StudentService,
    student_id: i64,
    mut body: CreateGuardianRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_name(&body.name).and(validate_name(&body.relation)) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(phone) = body.phone.as_deref()
        && let Err(msg) = validate_phone(phone)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Some(email) = body.email.take() {
        let email = normalize_email(&email);
        if let Err(msg) = validate_email(&email) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        body.email = Some(email);
    }

    let storage = service.get_storage(request);

    if let Err(response) = load_student(storage.as_ref(), student_id, "Failed to add guardian").await {
        return Ok(response);
    }

    match storage.create_guardian(student_id, body).await {
        Ok(guardian) => Ok(HttpResponse::Created().json(ApiResponse::success(
            guardian,
            "Guardian added successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to add guardian")),
    }
}

pub async fn delete_guardian(
    service: &StudentService,
    student_id: i64,
    guardian_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_guardian(student_id, guardian_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Guardian removed successfully"))),
        Ok(false) => Ok(not_found(ErrorCode::GuardianNotFound, "Guardian not found")),
        Err(e) => Ok(error_response(&e, "Failed to remove guardian")),
    }
}
