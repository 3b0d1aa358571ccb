use serde::Serialize;
use ts_rs::TS;

use super::entities::{Guardian, Student};
use crate::models::common::PaginationInfo;
use crate::models::enrollments::entities::{CreditSummary, Enrollment};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentListResponse {
    pub items: Vec<Student>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentDetailResponse {
    pub student: Student,
    pub guardians: Vec<Guardian>,
    pub enrollments: Vec<Enrollment>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct EnrollmentCredits {
    pub enrollment_id: i64,
    pub credits: CreditSummary,
}

// 学生课时汇总，总计中包含 metadata 的手工调整
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentCreditsResponse {
    pub student_id: i64,
    pub total: CreditSummary,
    pub enrollments: Vec<EnrollmentCredits>,
}
