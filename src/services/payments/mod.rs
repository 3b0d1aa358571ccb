pub mod create;
pub mod delete;
pub mod get;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::packages::entities::Package;
use crate::models::payments::requests::{CreatePaymentRequest, PaymentListParams};

super::define_service!(
    /// 收款登记
    PaymentService
);

/// 未显式给出课时数时取课程包的课时数，没有课程包则为 0
pub(crate) fn resolve_credits(requested: Option<i32>, package: Option<&Package>) -> i32 {
    requested
        .or_else(|| package.map(|p| p.classes_count))
        .unwrap_or(0)
}

impl PaymentService {
    pub async fn list_payments(
        &self,
        query: PaymentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_payments(self, query, request).await
    }

    pub async fn create_payment(
        &self,
        body: CreatePaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_payment(self, body, request).await
    }

    pub async fn get_payment(
        &self,
        payment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_payment(self, payment_id, request).await
    }

    pub async fn delete_payment(
        &self,
        payment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_payment(self, payment_id, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn package(classes_count: i32) -> Package {
        Package {
            id: 1,
            name: "8 classes".to_string(),
            instrument_id: None,
            classes_count,
            price: 4000,
            validity_days: 60,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_resolve_credits() {
        assert_eq!(resolve_credits(Some(3), Some(&package(8))), 3);
        assert_eq!(resolve_credits(None, Some(&package(8))), 8);
        assert_eq!(resolve_credits(None, None), 0);
        assert_eq!(resolve_credits(Some(0), Some(&package(8))), 0);
    }
}
