use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::payments::requests::{CreatePaymentRequest, PaymentListParams};
use crate::models::users::entities::UserRole;
use crate::services::PaymentService;
use crate::utils::SafeIDI64;

// 懒加载的全局 PaymentService 实例
static PAYMENT_SERVICE: Lazy<PaymentService> = Lazy::new(PaymentService::new_lazy);

pub async fn list_payments(
    req: HttpRequest,
    query: web::Query<PaymentListParams>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.list_payments(query.into_inner(), &req).await
}

pub async fn create_payment(
    req: HttpRequest,
    body: web::Json<CreatePaymentRequest>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.create_payment(body.into_inner(), &req).await
}

pub async fn get_payment(req: HttpRequest, payment_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.get_payment(payment_id.0, &req).await
}

pub async fn delete_payment(req: HttpRequest, payment_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.delete_payment(payment_id.0, &req).await
}

// 配置路由
pub fn configure_payment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/payments")
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_payments))
            .route("", web::post().to(create_payment))
            .route("/{id}", web::get().to(get_payment))
            .route(
                "/{id}",
                web::delete()
                    .to(delete_payment)
                    // 仅管理员可删除收款
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            ),
    );
}
