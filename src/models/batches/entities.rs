use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    BatchStatus("班次状态", "batch.ts") {
        Active => "active",
        Archived => "archived",
    }
}

// 班次：固定老师、固定乐器的周期性课程
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "batch.ts")]
pub struct Batch {
    pub id: i64,
    pub name: String,
    pub instrument_id: i64,
    pub teacher_id: i64,
    /// 例如 `MON,WED 17:00-18:00`
    pub recurrence: String,
    pub capacity: i32,
    pub status: BatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
