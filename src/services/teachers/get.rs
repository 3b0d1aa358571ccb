use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TeacherService, can_view_teacher};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response, forbidden, not_found, unauthorized};
use crate::storage::TeacherStorage;

pub async fn get_teacher(
    service: &TeacherService,
    teacher_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = current_user(request) else {
        return Ok(unauthorized());
    };
    if !can_view_teacher(&user, teacher_id) {
        return Ok(forbidden(
            ErrorCode::Forbidden,
            "You can only view your own teacher profile",
        ));
    }

    let storage = service.get_storage(request);
    match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(teacher)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            teacher,
            "Teacher retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => Ok(error_response(&e, "Failed to get teacher")),
    }
}
