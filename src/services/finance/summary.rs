use std::collections::BTreeMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FinanceService;
use crate::models::finance::entities::{Expense, MonthlyBudget};
use crate::models::finance::responses::{CategorySummary, FinanceSummary};
use crate::models::payments::entities::Payment;
use crate::models::teachers::entities::{PayoutStatus, TeacherPayout};
use crate::models::teachers::requests::MonthQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, resolve_month};
use crate::storage::{FinanceStorage, PaymentStorage};

/// 汇总一个月的收入、支出、预算与教师结算
pub(crate) fn summarize(
    month: &str,
    payments: &[Payment],
    expenses: &[Expense],
    budgets: &[MonthlyBudget],
    payouts: &[TeacherPayout],
) -> FinanceSummary {
    let revenue: i64 = payments.iter().map(|p| p.amount).sum();
    let expenses_total: i64 = expenses.iter().map(|e| e.amount).sum();

    let mut by_category: BTreeMap<&str, (i64, Option<i64>)> = BTreeMap::new();
    for expense in expenses {
        by_category.entry(expense.category.as_str()).or_default().0 += expense.amount;
    }
    for budget in budgets {
        by_category.entry(budget.category.as_str()).or_default().1 = Some(budget.amount);
    }
    let categories = by_category
        .into_iter()
        .map(|(category, (spent, budget))| CategorySummary {
            category: category.to_string(),
            spent,
            budget,
            remaining: budget.map(|b| b - spent),
        })
        .collect();

    let payouts_total: i64 = payouts.iter().map(|p| p.amount).sum();
    let payouts_paid: i64 = payouts
        .iter()
        .filter(|p| p.status == PayoutStatus::Paid)
        .map(|p| p.amount)
        .sum();

    FinanceSummary {
        month: month.to_string(),
        revenue,
        payments_count: payments.len() as i64,
        expenses_total,
        categories,
        payouts_total,
        payouts_paid,
        net: revenue - expenses_total - payouts_total,
    }
}

pub async fn get_summary(
    service: &FinanceService,
    query: MonthQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    const ACTION: &str = "Failed to build finance summary";

    let Some((month, first, last)) = resolve_month(query.month.as_deref()) else {
        return Ok(bad_request(ErrorCode::MonthInvalid, "month must be YYYY-MM"));
    };
    let storage = service.get_storage(request);

    let payments = match storage.list_payments_between(first, last).await {
        Ok(payments) => payments,
        Err(e) => return Ok(error_response(&e, ACTION)),
    };
    let expenses = match storage.list_expenses_between(first, last).await {
        Ok(expenses) => expenses,
        Err(e) => return Ok(error_response(&e, ACTION)),
    };
    let budgets = match storage.list_budgets(&month).await {
        Ok(budgets) => budgets,
        Err(e) => return Ok(error_response(&e, ACTION)),
    };
    let payouts = match storage.list_payouts(None, Some(&month)).await {
        Ok(payouts) => payouts,
        Err(e) => return Ok(error_response(&e, ACTION)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        summarize(&month, &payments, &expenses, &budgets, &payouts),
        "Finance summary retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payments::entities::PaymentMethod;
    use chrono::{NaiveDate, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    fn payment(amount: i64) -> Payment {
        Payment {
            id: 1,
            student_id: 1,
            enrollment_id: None,
            package_id: None,
            amount,
            credits: 4,
            method: PaymentMethod::Upi,
            paid_on: day(2),
            reference: None,
            notes: None,
            recorded_by: 1,
            created_at: Utc::now(),
        }
    }

    fn expense(category: &str, amount: i64) -> Expense {
        Expense {
            id: 1,
            category: category.to_string(),
            amount,
            spent_on: day(3),
            description: None,
            recorded_by: 1,
            created_at: Utc::now(),
        }
    }

    fn budget(category: &str, amount: i64) -> MonthlyBudget {
        MonthlyBudget {
            id: 1,
            month: "2024-09".to_string(),
            category: category.to_string(),
            amount,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn payout(amount: i64, status: PayoutStatus) -> TeacherPayout {
        TeacherPayout {
            id: 1,
            teacher_id: 1,
            period: "2024-09".to_string(),
            sessions: 8,
            amount,
            status,
            paid_on: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_totals_and_categories() {
        let summary = summarize(
            "2024-09",
            &[payment(5000), payment(3000)],
            &[expense("rent", 2000), expense("rent", 500), expense("repairs", 300)],
            &[budget("rent", 2000), budget("marketing", 400)],
            &[payout(1000, PayoutStatus::Paid), payout(700, PayoutStatus::Pending)],
        );

        assert_eq!(summary.revenue, 8000);
        assert_eq!(summary.payments_count, 2);
        assert_eq!(summary.expenses_total, 2800);
        assert_eq!(summary.payouts_total, 1700);
        assert_eq!(summary.payouts_paid, 1000);
        assert_eq!(summary.net, 8000 - 2800 - 1700);

        let names: Vec<&str> = summary.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["marketing", "rent", "repairs"]);
        let rent = &summary.categories[1];
        assert_eq!(rent.spent, 2500);
        assert_eq!(rent.remaining, Some(-500));
        assert_eq!(summary.categories[0].spent, 0);
        assert_eq!(summary.categories[2].budget, None);
    }
}
