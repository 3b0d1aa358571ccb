use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::models::teachers::requests::CreateTeacherRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response};
use crate::storage::TeacherStorage;
use crate::utils::validate::{
    normalize_email, validate_email, validate_name, validate_phone, validate_rate,
};

pub async fn create_teacher(
    service: &TeacherService,
    mut body: CreateTeacherRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_name(&body.name) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    body.name = body.name.trim().to_string();

    if let Err(msg) = validate_rate(body.rate) {
        return Ok(bad_request(ErrorCode::TeacherRateInvalid, msg));
    }
    if let Some(email) = body.email.take().filter(|e| !e.trim().is_empty()) {
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
    match storage.create_teacher(body).await {
        Ok(teacher) => {
            info!("Teacher {} created", teacher.id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(teacher, "Teacher created successfully")))
        }
        Err(e) => Ok(error_response(&e, "Teacher creation failed")),
    }
}
