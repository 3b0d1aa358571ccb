use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    EnrollmentStatus("报名状态", "enrollment.ts") {
        Active => "active",
        Paused => "paused",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub instrument_id: i64,
    pub package_id: Option<i64>,
    pub status: EnrollmentStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub batch_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 课时余额
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct CreditSummary {
    pub purchased: i64,
    pub consumed: i64,
    pub adjustment: i64,
    /// 可以为负数（欠课时）
    pub remaining: i64,
}
