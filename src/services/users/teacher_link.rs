use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::users::{requests::LinkTeacherRequest, responses::UserResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, invalidate_user_cache, is_unique_violation, not_found};
use crate::storage::{TeacherStorage, UserStorage};

pub async fn link_teacher(
    service: &UserService,
    user_id: i64,
    body: LinkTeacherRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(teacher_id) = body.teacher_id {
        match storage.get_teacher_by_id(teacher_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
            Err(e) => return Ok(error_response(&e, "Failed to link teacher")),
        }
    }

    match storage.link_user_teacher(user_id, body.teacher_id).await {
        Ok(Some(user)) => {
            invalidate_user_cache(request, user_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Teacher link updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        // 教师档案已关联到其他账号
        Err(e) if is_unique_violation(&e) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::TeacherAlreadyLinked,
                "Teacher is already linked to another account",
            ),
        )),
        Err(e) => Ok(error_response(&e, "Failed to link teacher")),
    }
}
