use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::finance::requests::{
    CreateExpenseRequest, ExpenseListParams, MarkPayoutPaidRequest, UpsertBudgetRequest,
};
use crate::models::teachers::requests::MonthQuery;
use crate::models::users::entities::UserRole;
use crate::services::FinanceService;
use crate::utils::{SafeIDI64, SafePayoutIdI64};

// 懒加载的全局 FinanceService 实例
static FINANCE_SERVICE: Lazy<FinanceService> = Lazy::new(FinanceService::new_lazy);

pub async fn list_expenses(
    req: HttpRequest,
    query: web::Query<ExpenseListParams>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.list_expenses(query.into_inner(), &req).await
}

pub async fn create_expense(
    req: HttpRequest,
    body: web::Json<CreateExpenseRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.create_expense(body.into_inner(), &req).await
}

pub async fn delete_expense(req: HttpRequest, expense_id: SafeIDI64) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.delete_expense(expense_id.0, &req).await
}

pub async fn get_budgets(
    req: HttpRequest,
    query: web::Query<MonthQuery>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.get_budgets(query.into_inner(), &req).await
}

pub async fn upsert_budget(
    req: HttpRequest,
    body: web::Json<UpsertBudgetRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.upsert_budget(body.into_inner(), &req).await
}

pub async fn get_summary(
    req: HttpRequest,
    query: web::Query<MonthQuery>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.get_summary(query.into_inner(), &req).await
}

pub async fn list_payouts(
    req: HttpRequest,
    query: web::Query<MonthQuery>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.list_payouts(query.into_inner(), &req).await
}

pub async fn generate_payouts(
    req: HttpRequest,
    query: web::Query<MonthQuery>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.generate_payouts(query.into_inner(), &req).await
}

// 请求体可省略
pub async fn mark_payout_paid(
    req: HttpRequest,
    payout_id: SafePayoutIdI64,
    body: Option<web::Json<MarkPayoutPaidRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(|b| b.into_inner()).unwrap_or_default();
    FINANCE_SERVICE
        .mark_payout_paid(payout_id.0, body, &req)
        .await
}

// 配置路由
pub fn configure_finance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/finance")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("/expenses", web::get().to(list_expenses))
            .route("/expenses", web::post().to(create_expense))
            .route("/expenses/{id}", web::delete().to(delete_expense))
            .route("/budgets", web::get().to(get_budgets))
            .route("/budgets", web::put().to(upsert_budget))
            .route("/summary", web::get().to(get_summary))
            .route("/payouts", web::get().to(list_payouts))
            .route("/payouts/generate", web::post().to(generate_payouts))
            .route("/payouts/{payout_id}/paid", web::put().to(mark_payout_paid)),
    );
}
