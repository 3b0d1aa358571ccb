use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TeacherService, can_view_teacher};
use crate::errors::Result;
use crate::models::teachers::entities::{Teacher, TeacherAttendance, TeacherAttendanceStatus};
use crate::models::teachers::responses::{
    Teacher360Response, TeacherAttendanceSummary, TeacherBatchSummary,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::projection::project_payout;
use crate::services::{
    bad_request, current_user, error_response, forbidden, not_found, resolve_month, unauthorized,
};
use crate::storage::{
    AttendanceStorage, BatchStorage, EvaluationStorage, FinanceStorage, Storage, TeacherStorage,
};

const RECENT_EVALUATIONS: u64 = 10;

fn summarize_attendance(month: &str, rows: &[TeacherAttendance]) -> TeacherAttendanceSummary {
    let mut summary = TeacherAttendanceSummary {
        month: month.to_string(),
        ..Default::default()
    };
    for row in rows {
        match row.status {
            TeacherAttendanceStatus::Present => summary.present += 1,
            TeacherAttendanceStatus::Absent => summary.absent += 1,
            TeacherAttendanceStatus::Substituted => summary.substituted += 1,
        }
    }
    summary
}

async fn build_overview(storage: &dyn Storage, teacher: Teacher) -> Result<Option<Teacher360Response>> {
    let Some((month, first, last)) = resolve_month(None) else {
        return Ok(None);
    };

    let mut batches = Vec::new();
    for batch in storage.list_teacher_batches(teacher.id, false).await? {
        let student_count = storage.count_batch_active_enrollments(batch.id).await?;
        batches.push(TeacherBatchSummary {
            batch,
            student_count,
        });
    }

    let attendance_rows = storage.list_teacher_attendance(teacher.id, first, last).await?;
    let attendance = summarize_attendance(&month, &attendance_rows);
    let recent_evaluations = storage
        .list_teacher_evaluations(teacher.id, RECENT_EVALUATIONS)
        .await?;
    let payouts = storage.list_payouts(Some(teacher.id), None).await?;
    let projection = project_payout(storage, &teacher, &month, first, last).await?;

    Ok(Some(Teacher360Response {
        teacher,
        batches,
        attendance,
        recent_evaluations,
        payouts,
        projection,
    }))
}

pub async fn get_overview(
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
    let teacher = match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(teacher)) => teacher,
        Ok(None) => return Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => return Ok(error_response(&e, "Failed to build teacher overview")),
    };

    match build_overview(storage.as_ref(), teacher).await {
        Ok(Some(overview)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            overview,
            "Teacher overview retrieved successfully",
        ))),
        Ok(None) => Ok(bad_request(ErrorCode::MonthInvalid, "Invalid current month")),
        Err(e) => Ok(error_response(&e, "Failed to build teacher overview")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(status: TeacherAttendanceStatus) -> TeacherAttendance {
        TeacherAttendance {
            id: 1,
            teacher_id: 1,
            batch_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            status,
            marked_by: 1,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_summarize_attendance() {
        let rows = vec![
            row(TeacherAttendanceStatus::Present),
            row(TeacherAttendanceStatus::Present),
            row(TeacherAttendanceStatus::Substituted),
            row(TeacherAttendanceStatus::Absent),
        ];
        let summary = summarize_attendance("2024-09", &rows);
        assert_eq!(summary.month, "2024-09");
        assert_eq!(
            (summary.present, summary.absent, summary.substituted),
            (2, 1, 1)
        );
    }
}
