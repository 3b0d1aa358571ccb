use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程包：N 节课的售价
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "package.ts")]
pub struct Package {
    pub id: i64,
    pub name: String,
    pub instrument_id: Option<i64>,
    pub classes_count: i32,
    pub price: i64,
    pub validity_days: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
