use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    /// 学生出勤状态
    AttendanceStatus("出勤状态", "attendance.ts") {
        Present => "present",
        Absent => "absent",   // 未请假缺席，照常扣课时
        Excused => "excused", // 已请假，不扣课时
    }
}

impl AttendanceStatus {
    pub fn consumes_credit(&self) -> bool {
        !matches!(self, Self::Excused)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub enrollment_id: i64,
    pub student_id: i64,
    pub batch_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub marked_by: i64,
    pub created_at: DateTime<Utc>,
}

/// 一次点名中单个学生的结果（已解析出报名记录）
#[derive(Debug, Clone)]
pub struct AttendanceMark {
    pub enrollment_id: i64,
    pub student_id: i64,
    pub status: AttendanceStatus,
}
