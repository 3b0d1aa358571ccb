use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, load_student};
use crate::models::ApiResponse;
use crate::services::credits::student_credits;
use crate::services::error_response;

pub async fn get_credits(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let student = match load_student(storage.as_ref(), student_id, "Failed to get credits").await {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    match student_credits(storage.as_ref(), &student).await {
        Ok(credits) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            credits,
            "Credits retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to get credits")),
    }
}
