use std::collections::{BTreeMap, HashMap};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{BatchService, load_accessible_batch};
use crate::config::AppConfig;
use crate::models::attendance::entities::AttendanceMark;
use crate::models::attendance::requests::{AttendanceDateQuery, MarkAttendanceRequest};
use crate::models::attendance::responses::BatchAttendanceResponse;
use crate::models::enrollments::entities::Enrollment;
use crate::models::notifications::entities::NotificationKind;
use crate::models::students::entities::Student;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::credits::enrollment_credits;
use crate::services::notifications::{NotificationDraft, notify_office};
use crate::services::{bad_request, current_user, error_response, unauthorized};
use crate::storage::{AttendanceStorage, BatchStorage, Storage};
use crate::utils::credits::is_low_balance;

/// 点名：教师只能为自己的班次点当天的名，教务可补登任意日期
pub async fn mark_attendance(
    service: &BatchService,
    batch_id: i64,
    body: MarkAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = current_user(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request);

    let batch = match load_accessible_batch(
        storage.as_ref(),
        &user,
        batch_id,
        "Failed to mark attendance",
    )
    .await
    {
        Ok(batch) => batch,
        Err(response) => return Ok(response),
    };

    let today = AppConfig::get().school_today();
    let date = body.date.unwrap_or(today);
    if !user.is_office() && date != today {
        return Ok(bad_request(
            ErrorCode::AttendanceDateNotAllowed,
            format!("Teachers can only mark attendance for today ({today})"),
        ));
    }
    if body.entries.is_empty() {
        return Ok(bad_request(ErrorCode::AttendanceEmpty, "No attendance entries submitted"));
    }

    let roster = match storage.list_batch_roster(batch.id).await {
        Ok(roster) => roster,
        Err(e) => return Ok(error_response(&e, "Failed to mark attendance")),
    };
    let seated: HashMap<i64, (Enrollment, Student)> = roster
        .into_iter()
        .map(|(enrollment, student)| (student.id, (enrollment, student)))
        .collect();

    // 同一学生重复提交时以最后一条为准
    let mut marks = BTreeMap::new();
    for entry in body.entries {
        let Some((enrollment, _)) = seated.get(&entry.student_id) else {
            return Ok(bad_request(
                ErrorCode::AttendanceStudentNotEnrolled,
                format!("Student {} is not enrolled in this batch", entry.student_id),
            ));
        };
        marks.insert(
            entry.student_id,
            AttendanceMark {
                enrollment_id: enrollment.id,
                student_id: entry.student_id,
                status: entry.status,
            },
        );
    }
    let marks: Vec<AttendanceMark> = marks.into_values().collect();

    let records = match storage
        .mark_batch_attendance(batch.id, batch.teacher_id, date, marks, user.id)
        .await
    {
        Ok(records) => records,
        Err(e) => return Ok(error_response(&e, "Failed to mark attendance")),
    };
    info!(
        "User {} marked {} attendance records for batch {} on {}",
        user.id,
        records.len(),
        batch.id,
        date
    );

    let touched: Vec<&(Enrollment, Student)> = records
        .iter()
        .filter_map(|r| seated.get(&r.student_id))
        .collect();
    notify_low_credits(storage.as_ref(), &touched).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(records, "Attendance saved successfully")))
}

/// 余额降到阈值及以下时提醒管理员与教务
async fn notify_low_credits(storage: &dyn Storage, touched: &[&(Enrollment, Student)]) {
    let config = AppConfig::get();
    for (enrollment, student) in touched {
        let summary = match enrollment_credits(storage, enrollment).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!("Failed to compute credits for enrollment {}: {}", enrollment.id, e);
                continue;
            }
        };
        if !is_low_balance(&summary, config.school.low_credit_threshold) {
            continue;
        }
        let draft = NotificationDraft::new(
            NotificationKind::LowCredits,
            format!("{} is running low on credits", student.full_name()),
        )
        .body(format!(
            "Enrollment #{} has {} credits remaining",
            enrollment.id, summary.remaining
        ))
        .link(format!("/students/{}", student.id));
        notify_office(storage, draft).await;
    }
}

pub async fn get_attendance(
    service: &BatchService,
    batch_id: i64,
    query: AttendanceDateQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = current_user(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request);

    let batch = match load_accessible_batch(
        storage.as_ref(),
        &user,
        batch_id,
        "Failed to get attendance",
    )
    .await
    {
        Ok(batch) => batch,
        Err(response) => return Ok(response),
    };

    let date = query.date.unwrap_or_else(|| AppConfig::get().school_today());

    let records = match storage.list_batch_attendance(batch.id, date).await {
        Ok(records) => records,
        Err(e) => return Ok(error_response(&e, "Failed to get attendance")),
    };
    let teacher_status = match storage.get_teacher_attendance(batch.id, date).await {
        Ok(record) => record.map(|r| r.status),
        Err(e) => return Ok(error_response(&e, "Failed to get attendance")),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        BatchAttendanceResponse {
            batch_id: batch.id,
            date,
            teacher_status,
            records,
        },
        "Attendance retrieved successfully",
    )))
}
