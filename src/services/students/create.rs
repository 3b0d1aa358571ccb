use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StudentService, validate_student_fields};
use crate::models::students::requests::CreateStudentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response};
use crate::storage::StudentStorage;

pub async fn create_student(
    service: &StudentService,
    mut body: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_student_fields(
        Some(&body.first_name),
        &mut body.email,
        body.phone.as_deref(),
        body.metadata.as_ref(),
    ) {
        return Ok(bad_request(ErrorCode::StudentInvalid, msg));
    }
    body.first_name = body.first_name.trim().to_string();
    body.last_name = body.last_name.trim().to_string();

    let storage = service.get_storage(request);

    match storage.create_student(body).await {
        Ok(student) => {
            info!("Student {} created with status {}", student.id, student.status);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                student,
                "Student created successfully",
            )))
        }
        Err(e) => Ok(error_response(&e, "Student creation failed")),
    }
}
