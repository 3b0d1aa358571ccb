use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, load_student};
use crate::models::ApiResponse;
use crate::models::students::responses::StudentDetailResponse;
use crate::services::error_response;
use crate::storage::{EnrollmentStorage, StudentStorage};

pub async fn get_student(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let student = match load_student(storage.as_ref(), student_id, "Failed to get student").await {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };
    let guardians = match storage.list_guardians(student.id).await {
        Ok(guardians) => guardians,
        Err(e) => return Ok(error_response(&e, "Failed to get student")),
    };
    let enrollments = match storage.list_student_enrollments(student.id).await {
        Ok(enrollments) => enrollments,
        Err(e) => return Ok(error_response(&e, "Failed to get student")),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StudentDetailResponse {
            student,
            guardians,
            enrollments,
        },
        "Student information retrieved successfully",
    )))
}
