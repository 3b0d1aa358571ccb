use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProspectService;
use crate::models::prospects::requests::CreateProspectRequest;
use crate::models::students::entities::StudentStatus;
use crate::models::students::requests::CreateStudentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::validate_student_fields;
use crate::services::{bad_request, error_response};
use crate::storage::StudentStorage;

pub async fn create_prospect(
    service: &ProspectService,
    body: CreateProspectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let mut student = CreateStudentRequest {
        first_name: body.first_name.trim().to_string(),
        last_name: body.last_name.trim().to_string(),
        date_of_birth: body.date_of_birth,
        email: body.email,
        phone: body.phone,
        status: Some(StudentStatus::Prospect),
        source: body.source.filter(|s| !s.trim().is_empty()),
        metadata: None,
        notes: body.notes,
    };
    if let Err(msg) = validate_student_fields(
        Some(&student.first_name),
        &mut student.email,
        student.phone.as_deref(),
        None,
    ) {
        return Ok(bad_request(ErrorCode::StudentInvalid, msg));
    }

    let storage = service.get_storage(request);

    match storage.create_student(student).await {
        Ok(prospect) => Ok(HttpResponse::Created().json(ApiResponse::success(
            prospect,
            "Prospect created successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Prospect creation failed")),
    }
}
