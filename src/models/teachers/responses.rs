use serde::Serialize;
use ts_rs::TS;

use super::entities::{PayoutType, Teacher, TeacherPayout};
use crate::models::batches::entities::Batch;
use crate::models::common::PaginationInfo;
use crate::models::evaluations::entities::StudentEvaluation;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct TeacherListResponse {
    pub items: Vec<Teacher>,
    pub pagination: PaginationInfo,
}

// 结算预估：排课推算的计划课时与出勤记录的实际课时
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct PayoutProjection {
    pub teacher_id: i64,
    pub month: String,
    pub payout_type: PayoutType,
    pub rate: i64,
    pub scheduled_sessions: i64,
    pub projected_amount: i64,
    pub delivered_sessions: i64,
    pub earned_amount: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct TeacherBatchSummary {
    pub batch: Batch,
    pub student_count: i64,
}

#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct TeacherAttendanceSummary {
    pub month: String,
    pub present: i64,
    pub absent: i64,
    pub substituted: i64,
}

// 教师 360 视图
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct Teacher360Response {
    pub teacher: Teacher,
    pub batches: Vec<TeacherBatchSummary>,
    pub attendance: TeacherAttendanceSummary,
    pub recent_evaluations: Vec<StudentEvaluation>,
    pub payouts: Vec<TeacherPayout>,
    pub projection: PayoutProjection,
}
