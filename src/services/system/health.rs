use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use chrono::Utc;
use tracing::warn;

use super::SystemService;
use crate::models::system::responses::HealthResponse;
use crate::models::{ApiResponse, AppStartTime, ErrorCode};
use crate::services::notifications::ConnectionManager;
use crate::storage::SystemStorage;

/// 数据库不可用时返回 503，负载均衡据此摘除实例
pub async fn health(service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let uptime_seconds = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| (Utc::now() - start.start_datetime).num_seconds())
        .unwrap_or(0);

    let storage = service.get_storage(request);
    let database_ok = match storage.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("Health check database ping failed: {}", e);
            false
        }
    };

    let response = HealthResponse {
        status: if database_ok { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        database: if database_ok { "up" } else { "down" }.to_string(),
        notification_streams: ConnectionManager::get().online_count(),
    };

    if database_ok {
        Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Service is healthy")))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::error(
            ErrorCode::InternalServerError,
            response,
            "Database is unavailable",
        )))
    }
}
