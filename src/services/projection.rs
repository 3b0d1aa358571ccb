//! 教师结算预估

use chrono::NaiveDate;

use crate::errors::{Result, SchoolError};
use crate::models::teachers::{entities::Teacher, responses::PayoutProjection};
use crate::storage::{AttendanceStorage, BatchStorage, Storage};
use crate::utils::payouts::{delivered_sessions, payout_amount, scheduled_sessions};
use crate::utils::recurrence::Recurrence;

/// 计划课时按在读班次的排课推算，实际课时取教师出勤记录
pub async fn project_payout(
    storage: &dyn Storage,
    teacher: &Teacher,
    month: &str,
    first: NaiveDate,
    last: NaiveDate,
) -> Result<PayoutProjection> {
    let batches = storage.list_teacher_batches(teacher.id, true).await?;
    let recurrences: Vec<Recurrence> = batches
        .iter()
        .filter_map(|b| match b.recurrence.parse::<Recurrence>() {
            Ok(r) => Some(r),
            Err(e) => {
                tracing::warn!("Skipping batch {} with bad recurrence: {}", b.id, e);
                None
            }
        })
        .collect();
    let scheduled = scheduled_sessions(&recurrences, first, last);

    let attendance = storage
        .list_teacher_attendance(teacher.id, first, last)
        .await?;
    let delivered = delivered_sessions(attendance.iter().map(|a| a.status));

    let amount = |sessions: i64| {
        payout_amount(teacher.payout_type, teacher.rate, sessions).ok_or_else(|| {
            SchoolError::validation(format!(
                "Payout amount overflows for teacher {} ({} sessions at rate {})",
                teacher.id, sessions, teacher.rate
            ))
        })
    };
    let projected_amount = amount(scheduled)?;
    let earned_amount = amount(delivered)?;

    Ok(PayoutProjection {
        teacher_id: teacher.id,
        month: month.to_string(),
        payout_type: teacher.payout_type,
        rate: teacher.rate,
        scheduled_sessions: scheduled,
        projected_amount,
        delivered_sessions: delivered,
        earned_amount,
    })
}
