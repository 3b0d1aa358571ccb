use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FinanceService, normalize_category};
use crate::models::finance::requests::UpsertBudgetRequest;
use crate::models::teachers::requests::MonthQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, resolve_month};
use crate::storage::FinanceStorage;
use crate::utils::month::parse_month;

pub async fn get_budgets(
    service: &FinanceService,
    query: MonthQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some((month, _, _)) = resolve_month(query.month.as_deref()) else {
        return Ok(bad_request(ErrorCode::MonthInvalid, "month must be YYYY-MM"));
    };
    let storage = service.get_storage(request);

    match storage.list_budgets(&month).await {
        Ok(budgets) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            budgets,
            "Budgets retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to retrieve budgets")),
    }
}

/// 按 (month, category) 新增或覆盖预算
pub async fn upsert_budget(
    service: &FinanceService,
    body: UpsertBudgetRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let month = body.month.trim();
    if parse_month(month).is_none() {
        return Ok(bad_request(ErrorCode::MonthInvalid, "month must be YYYY-MM"));
    }
    let Some(category) = normalize_category(&body.category) else {
        return Ok(bad_request(ErrorCode::BadRequest, "category is invalid"));
    };
    if body.amount < 0 {
        return Ok(bad_request(ErrorCode::BadRequest, "amount must not be negative"));
    }

    let storage = service.get_storage(request);

    match storage.upsert_budget(month, &category, body.amount).await {
        Ok(budget) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            budget,
            "Budget saved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to save budget")),
    }
}
