use serde::Serialize;
use ts_rs::TS;

use super::entities::Batch;
use crate::models::common::PaginationInfo;
use crate::models::enrollments::entities::EnrollmentStatus;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "batch.ts")]
pub struct BatchListResponse {
    pub items: Vec<Batch>,
    pub pagination: PaginationInfo,
}

// 花名册条目
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "batch.ts")]
pub struct RosterEntry {
    pub enrollment_id: i64,
    pub student_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub enrollment_status: EnrollmentStatus,
    pub remaining_credits: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "batch.ts")]
pub struct BatchRosterResponse {
    pub batch: Batch,
    pub students: Vec<RosterEntry>,
}
