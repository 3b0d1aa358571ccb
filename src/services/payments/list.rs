use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PaymentService;
use crate::models::payments::requests::{PaymentListParams, PaymentListQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response};
use crate::storage::PaymentStorage;

pub async fn list_payments(
    service: &PaymentService,
    query: PaymentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let (Some(from), Some(to)) = (query.from, query.to)
        && from > to
    {
        return Ok(bad_request(ErrorCode::BadRequest, "from must not be after to"));
    }

    let storage = service.get_storage(request);
    let list_query = PaymentListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        student_id: query.student_id,
        method: query.method,
        from: query.from,
        to: query.to,
    };

    match storage.list_payments_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Payment list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to retrieve payment list")),
    }
}
