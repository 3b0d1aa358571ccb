use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, validate_student_fields};
use crate::models::students::requests::UpdateStudentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found};
use crate::storage::StudentStorage;

/// metadata 按顶层键浅合并，值为 null 的键被移除
pub async fn update_student(
    service: &StudentService,
    student_id: i64,
    mut body: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_student_fields(
        body.first_name.as_deref(),
        &mut body.email,
        body.phone.as_deref(),
        body.metadata.as_ref(),
    ) {
        return Ok(bad_request(ErrorCode::StudentInvalid, msg));
    }
    body.first_name = body.first_name.map(|n| n.trim().to_string());
    body.last_name = body.last_name.map(|n| n.trim().to_string());

    let storage = service.get_storage(request);

    match storage.update_student(student_id, body).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Student updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Ok(error_response(&e, "Failed to update student")),
    }
}
