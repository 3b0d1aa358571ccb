use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FinanceService, normalize_category};
use crate::config::AppConfig;
use crate::models::finance::requests::{CreateExpenseRequest, ExpenseListParams, ExpenseListQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    bad_request, current_user, error_response, not_found, resolve_month, unauthorized,
};
use crate::storage::FinanceStorage;

/// 支出列表，month 为空时不按月份过滤
pub async fn list_expenses(
    service: &FinanceService,
    query: ExpenseListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let range = match query.month.as_deref().filter(|m| !m.trim().is_empty()) {
        Some(month) => match resolve_month(Some(month)) {
            Some((_, first, last)) => Some((first, last)),
            None => return Ok(bad_request(ErrorCode::MonthInvalid, "month must be YYYY-MM")),
        },
        None => None,
    };

    let storage = service.get_storage(request);
    let list_query = ExpenseListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        range,
        category: query.category.as_deref().and_then(normalize_category),
    };

    match storage.list_expenses_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Expense list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to retrieve expenses")),
    }
}

pub async fn create_expense(
    service: &FinanceService,
    mut body: CreateExpenseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = current_user(request) else {
        return Ok(unauthorized());
    };
    if body.amount <= 0 {
        return Ok(bad_request(ErrorCode::BadRequest, "amount must be positive"));
    }
    let Some(category) = normalize_category(&body.category) else {
        return Ok(bad_request(ErrorCode::BadRequest, "category is invalid"));
    };
    body.category = category;
    if body.spent_on.is_none() {
        body.spent_on = Some(AppConfig::get().school_today());
    }

    let storage = service.get_storage(request);

    match storage.create_expense(body, user.id).await {
        Ok(expense) => Ok(HttpResponse::Created().json(ApiResponse::success(
            expense,
            "Expense recorded successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to record expense")),
    }
}

pub async fn delete_expense(
    service: &FinanceService,
    expense_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_expense(expense_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Expense deleted successfully"))),
        Ok(false) => Ok(not_found(ErrorCode::ExpenseNotFound, "Expense not found")),
        Err(e) => Ok(error_response(&e, "Failed to delete expense")),
    }
}
