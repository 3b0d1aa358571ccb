use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::PaymentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response, not_found, unauthorized};
use crate::storage::PaymentStorage;

// 删除收款会减少学生的已购课时
pub async fn delete_payment(
    service: &PaymentService,
    payment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = current_user(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request);

    match storage.delete_payment(payment_id).await {
        Ok(true) => {
            warn!("Payment {} deleted by user {}", payment_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Payment deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::PaymentNotFound, "Payment not found")),
        Err(e) => Ok(error_response(&e, "Failed to delete payment")),
    }
}
