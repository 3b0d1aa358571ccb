pub mod health;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

super::define_service!(
    /// 健康检查
    SystemService
);

impl SystemService {
    pub async fn health(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        health::health(self, request).await
    }
}
