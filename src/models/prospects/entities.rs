use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 潜在学员跟进记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "prospect.ts")]
pub struct ProspectNote {
    pub id: i64,
    pub student_id: i64,
    pub author_id: i64,
    pub note: String,
    pub follow_up_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}
