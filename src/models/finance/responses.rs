use serde::Serialize;
use ts_rs::TS;

use super::entities::Expense;
use crate::models::common::PaginationInfo;
use crate::models::teachers::entities::TeacherPayout;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct ExpenseListResponse {
    pub items: Vec<Expense>,
    pub pagination: PaginationInfo,
}

// 分类支出与预算对比
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct CategorySummary {
    pub category: String,
    pub spent: i64,
    pub budget: Option<i64>,
    /// 预算余额，未设置预算时为空
    pub remaining: Option<i64>,
}

// 月度财务汇总
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct FinanceSummary {
    pub month: String,
    pub revenue: i64,
    pub payments_count: i64,
    pub expenses_total: i64,
    pub categories: Vec<CategorySummary>,
    pub payouts_total: i64,
    pub payouts_paid: i64,
    /// revenue - expenses_total - payouts_total
    pub net: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct GeneratePayoutsResponse {
    pub month: String,
    pub created: Vec<TeacherPayout>,
    /// 该月已存在结算记录而跳过的教师数
    pub skipped: i64,
}
