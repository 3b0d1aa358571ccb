pub mod budgets;
pub mod expenses;
pub mod payouts;
pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::finance::requests::{
    CreateExpenseRequest, ExpenseListParams, MarkPayoutPaidRequest, UpsertBudgetRequest,
};
use crate::models::teachers::requests::MonthQuery;

super::define_service!(
    /// 支出、预算、月度汇总与教师结算
    FinanceService
);

/// 分类统一小写去空白，保证支出与预算能对上
pub(crate) fn normalize_category(category: &str) -> Option<String> {
    let category = category.trim().to_lowercase();
    (!category.is_empty() && category.chars().count() <= 50).then_some(category)
}

impl FinanceService {
    pub async fn list_expenses(
        &self,
        query: ExpenseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        expenses::list_expenses(self, query, request).await
    }

    pub async fn create_expense(
        &self,
        body: CreateExpenseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        expenses::create_expense(self, body, request).await
    }

    pub async fn delete_expense(
        &self,
        expense_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        expenses::delete_expense(self, expense_id, request).await
    }

    pub async fn get_budgets(
        &self,
        query: MonthQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        budgets::get_budgets(self, query, request).await
    }

    pub async fn upsert_budget(
        &self,
        body: UpsertBudgetRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        budgets::upsert_budget(self, body, request).await
    }

    pub async fn get_summary(
        &self,
        query: MonthQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        summary::get_summary(self, query, request).await
    }

    pub async fn list_payouts(
        &self,
        query: MonthQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        payouts::list_payouts(self, query, request).await
    }

    pub async fn generate_payouts(
        &self,
        query: MonthQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        payouts::generate_payouts(self, query, request).await
    }

    pub async fn mark_payout_paid(
        &self,
        payout_id: i64,
        body: MarkPayoutPaidRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        payouts::mark_payout_paid(self, payout_id, body, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category("  Rent "), Some("rent".to_string()));
        assert_eq!(normalize_category("   "), None);
        assert_eq!(normalize_category(&"x".repeat(51)), None);
    }
}
