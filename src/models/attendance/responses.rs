use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use super::entities::AttendanceRecord;
use crate::models::teachers::entities::TeacherAttendanceStatus;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct BatchAttendanceResponse {
    pub batch_id: i64,
    pub date: NaiveDate,
    pub teacher_status: Option<TeacherAttendanceStatus>,
    pub records: Vec<AttendanceRecord>,
}
