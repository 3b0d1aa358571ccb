use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct Expense {
    pub id: i64,
    pub category: String,
    pub amount: i64,
    pub spent_on: NaiveDate,
    pub description: Option<String>,
    pub recorded_by: i64,
    pub created_at: DateTime<Utc>,
}

// 月度预算，(month, category) 唯一
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct MonthlyBudget {
    pub id: i64,
    pub month: String,
    pub category: String,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
