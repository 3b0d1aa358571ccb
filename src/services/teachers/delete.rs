use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, invalidate_user_cache, not_found};
use crate::storage::{BatchStorage, TeacherStorage};

pub async fn delete_teacher(
    service: &TeacherService,
    teacher_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 仍有班次的教师不能删除，应改为停用
    match storage.list_teacher_batches(teacher_id, false).await {
        Ok(batches) if !batches.is_empty() => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::TeacherInUse,
                "Teacher still has batches, deactivate instead",
            )));
        }
        Ok(_) => {}
        Err(e) => return Ok(error_response(&e, "Failed to delete teacher")),
    }

    let teacher = match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(teacher)) => teacher,
        Ok(None) => return Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => return Ok(error_response(&e, "Failed to delete teacher")),
    };

    match storage.delete_teacher(teacher_id).await {
        Ok(true) => {
            // 关联账号缓存中的 teacher_id 失效
            if let Some(user_id) = teacher.user_id {
                invalidate_user_cache(request, user_id).await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Teacher deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => Ok(error_response(&e, "Failed to delete teacher")),
    }
}
