use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "instrument.ts")]
pub struct Instrument {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
