use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, is_foreign_key_violation, not_found};
use crate::storage::StudentStorage;

pub async fn delete_student(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_student(student_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Student deleted successfully"))),
        Ok(false) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        // 有收款记录的学生只能标记为 left
        Err(e) if is_foreign_key_violation(&e) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::Conflict,
                "Student has payment history, set status to left instead",
            ),
        )),
        Err(e) => Ok(error_response(&e, "Failed to delete student")),
    }
}
