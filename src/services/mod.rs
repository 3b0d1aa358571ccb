//! 业务逻辑层
//!
//! 每个领域一个 `XxxService`，路由层持有其懒加载的全局实例；
//! 每个操作单独一个文件，统一返回 `ActixResult<HttpResponse>`。

pub mod auth;
pub mod batches;
pub mod credits;
pub mod enrollments;
pub mod finance;
pub mod instruments;
pub mod mail;
pub mod notifications;
pub mod packages;
pub mod payments;
pub mod projection;
pub mod prospects;
pub mod students;
pub mod system;
pub mod teachers;
pub mod users;

pub use auth::AuthService;
pub use batches::BatchService;
pub use enrollments::EnrollmentService;
pub use finance::FinanceService;
pub use instruments::InstrumentService;
pub use notifications::NotificationService;
pub use packages::PackageService;
pub use payments::PaymentService;
pub use prospects::ProspectService;
pub use students::StudentService;
pub use system::SystemService;
pub use teachers::TeacherService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse};
use chrono::NaiveDate;
use tracing::error;

use crate::cache::{ObjectCache, user_cache_key};
use crate::config::AppConfig;
use crate::errors::SchoolError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, users::entities::User};
use crate::utils::month::{format_month, parse_month};

/// 生成服务结构体：懒加载，存储从请求的 app_data 中获取
macro_rules! define_service {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name {
            storage: Option<std::sync::Arc<dyn crate::storage::Storage>>,
        }

        impl $name {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> std::sync::Arc<dyn crate::storage::Storage> {
                if let Some(storage) = &self.storage {
                    storage.clone()
                } else {
                    request
                        .app_data::<actix_web::web::Data<std::sync::Arc<dyn crate::storage::Storage>>>()
                        .expect("Storage not found in app data")
                        .get_ref()
                        .clone()
                }
            }
        }
    };
}
pub(crate) use define_service;

/// 用户资料、角色或状态变更后清除鉴权缓存
pub(crate) async fn invalidate_user_cache(request: &HttpRequest, user_id: i64) {
    if let Some(cache) = request.app_data::<actix_web::web::Data<std::sync::Arc<dyn ObjectCache>>>() {
        cache.remove(&user_cache_key(user_id)).await;
    }
}

/// 当前登录用户，RequireJWT 之后一定存在
pub(crate) fn current_user(request: &HttpRequest) -> Option<User> {
    RequireJWT::extract_user_claims(request)
}

pub(crate) fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized access, please login",
    ))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn forbidden(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

/// 唯一约束冲突（SQLite / PostgreSQL / MySQL 的报错文本）
pub(crate) fn is_unique_violation(e: &SchoolError) -> bool {
    let msg = e.message();
    msg.contains("UNIQUE constraint failed")
        || msg.contains("duplicate key value")
        || msg.contains("Duplicate entry")
}

/// 外键约束失败：记录仍被引用
pub(crate) fn is_foreign_key_violation(e: &SchoolError) -> bool {
    let msg = e.message();
    msg.contains("FOREIGN KEY constraint failed")
        || msg.contains("violates foreign key constraint")
        || msg.contains("a foreign key constraint fails")
}

/// 存储层错误转换为响应
pub(crate) fn error_response(e: &SchoolError, action: &str) -> HttpResponse {
    match e {
        SchoolError::NotFound(msg) => not_found(ErrorCode::NotFound, msg.as_str()),
        SchoolError::Validation(msg) => bad_request(ErrorCode::BadRequest, msg.as_str()),
        SchoolError::Conflict(msg) => {
            HttpResponse::Conflict().json(ApiResponse::error_empty(ErrorCode::Conflict, msg.as_str()))
        }
        _ if is_unique_violation(e) => HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            format!("{action}: resource already exists"),
        )),
        _ => {
            error!("{}: {}", action, e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("{action}: {}", e.message()),
            ))
        }
    }
}

/// 解析 `YYYY-MM`，缺省为学校时区下的当月
pub(crate) fn resolve_month(month: Option<&str>) -> Option<(String, NaiveDate, NaiveDate)> {
    let month = match month.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => m.to_string(),
        None => format_month(AppConfig::get().school_today()),
    };
    let (first, last) = parse_month(&month)?;
    Some((month, first, last))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_detection() {
        assert!(is_unique_violation(&SchoolError::database_operation(
            "创建乐器失败: UNIQUE constraint failed: instruments.name"
        )));
        assert!(is_unique_violation(&SchoolError::database_operation(
            "duplicate key value violates unique constraint"
        )));
        assert!(!is_unique_violation(&SchoolError::database_operation("timeout")));
    }

    #[test]
    fn test_resolve_month() {
        let (month, first, last) = resolve_month(Some("2024-02")).unwrap();
        assert_eq!(month, "2024-02");
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(resolve_month(Some("2024-13")).is_none());
        assert!(resolve_month(None).is_some());
    }

    #[test]
    fn test_error_response_status() {
        assert_eq!(
            error_response(&SchoolError::not_found("x"), "op").status(),
            actix_web::http::StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(&SchoolError::conflict("full"), "op").status(),
            actix_web::http::StatusCode::CONFLICT
        );
    }
}
