use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::models::teachers::requests::MarkTeacherAttendanceRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response, not_found, unauthorized};
use crate::storage::{AttendanceStorage, BatchStorage, TeacherStorage};

/// 管理员或教务补登，任意日期；代课时 teacher_id 可以不是班次的任课教师
pub async fn mark_attendance(
    service: &TeacherService,
    teacher_id: i64,
    body: MarkTeacherAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = current_user(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request);

    match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => return Ok(error_response(&e, "Failed to mark teacher attendance")),
    }
    match storage.get_batch_by_id(body.batch_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::BatchNotFound, "Batch not found")),
        Err(e) => return Ok(error_response(&e, "Failed to mark teacher attendance")),
    }

    match storage
        .upsert_teacher_attendance(teacher_id, body.batch_id, body.date, body.status, user.id)
        .await
    {
        Ok(record) => {
            info!(
                "Teacher {} marked {} for batch {} on {}",
                teacher_id, record.status, record.batch_id, record.date
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                record,
                "Teacher attendance saved successfully",
            )))
        }
        Err(e) => Ok(error_response(&e, "Failed to mark teacher attendance")),
    }
}
