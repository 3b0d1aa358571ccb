//! 课时余额查询
//!
//! 从收款与出勤记录实时计算，不单独存储余额。

use crate::errors::Result;
use crate::models::{
    attendance::entities::AttendanceRecord,
    enrollments::entities::{CreditSummary, Enrollment},
    payments::entities::Payment,
    students::{
        entities::Student,
        responses::{EnrollmentCredits, StudentCreditsResponse},
    },
};
use crate::storage::{AttendanceStorage, EnrollmentStorage, PaymentStorage, Storage};
use crate::utils::credits::compute_credits;

fn summarize_enrollment(
    enrollment_id: i64,
    payments: &[Payment],
    attendance: &[AttendanceRecord],
) -> CreditSummary {
    compute_credits(
        payments
            .iter()
            .filter(|p| p.enrollment_id == Some(enrollment_id))
            .map(|p| p.credits as i64),
        attendance
            .iter()
            .filter(|a| a.enrollment_id == enrollment_id)
            .map(|a| a.status),
        0,
    )
}

/// 单个报名的课时余额（只统计关联到该报名的收款）
pub async fn enrollment_credits(
    storage: &dyn Storage,
    enrollment: &Enrollment,
) -> Result<CreditSummary> {
    let payments = storage.list_student_payments(enrollment.student_id).await?;
    let attendance = storage.list_enrollment_attendance(enrollment.id).await?;
    Ok(summarize_enrollment(enrollment.id, &payments, &attendance))
}

/// 学生总余额与各报名余额，总计包含 metadata 中的手工调整
pub async fn student_credits(
    storage: &dyn Storage,
    student: &Student,
) -> Result<StudentCreditsResponse> {
    let payments = storage.list_student_payments(student.id).await?;
    let attendance = storage.list_student_attendance(student.id).await?;
    let enrollments = storage.list_student_enrollments(student.id).await?;

    let total = compute_credits(
        payments.iter().map(|p| p.credits as i64),
        attendance.iter().map(|a| a.status),
        student.credit_adjustment(),
    );

    let enrollments = enrollments
        .iter()
        .map(|e| EnrollmentCredits {
            enrollment_id: e.id,
            credits: summarize_enrollment(e.id, &payments, &attendance),
        })
        .collect();

    Ok(StudentCreditsResponse {
        student_id: student.id,
        total,
        enrollments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::entities::AttendanceStatus;
    use crate::models::payments::entities::PaymentMethod;
    use chrono::{NaiveDate, Utc};

    fn payment(enrollment_id: Option<i64>, credits: i32) -> Payment {
        Payment {
            id: 1,
            student_id: 1,
            enrollment_id,
            package_id: None,
            amount: 1000,
            credits,
            method: PaymentMethod::Cash,
            paid_on: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            reference: None,
            notes: None,
            recorded_by: 1,
            created_at: Utc::now(),
        }
    }

    fn record(enrollment_id: i64, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: 1,
            enrollment_id,
            student_id: 1,
            batch_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            status,
            marked_by: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_enrollment_summary_ignores_other_enrollments() {
        let payments = [payment(Some(1), 8), payment(Some(2), 4), payment(None, 2)];
        let attendance = [
            record(1, AttendanceStatus::Present),
            record(1, AttendanceStatus::Excused),
            record(2, AttendanceStatus::Absent),
        ];
        let summary = summarize_enrollment(1, &payments, &attendance);
        assert_eq!(summary.purchased, 8);
        assert_eq!(summary.consumed, 1);
        assert_eq!(summary.remaining, 7);
    }
}
