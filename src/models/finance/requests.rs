use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct ExpenseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub month: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExpenseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    /// 闭区间
    pub range: Option<(NaiveDate, NaiveDate)>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct CreateExpenseRequest {
    pub category: String,
    pub amount: i64,
    pub spent_on: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct UpsertBudgetRequest {
    pub month: String,
    pub category: String,
    pub amount: i64,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct MarkPayoutPaidRequest {
    pub paid_on: Option<NaiveDate>,
    pub notes: Option<String>,
}
