//! 路径参数提取器
//!
//! 将 `{id}` 等路径段解析为正整数，失败时直接返回 400 响应，
//! 避免在每个处理函数中重复校验。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use std::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path_param(name: &str, raw: Option<&str>) -> actix_web::Error {
    let message = match raw {
        Some(raw) => format!("Invalid path parameter '{name}': '{raw}'"),
        None => format!("Missing path parameter '{name}'"),
    };
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

/// 解析路径中的正整数 ID
pub fn parse_positive_i64(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(name);
    match raw.map(|v| v.parse::<i64>()) {
        Some(Ok(value)) if value > 0 => Ok(value),
        _ => Err(bad_path_param(name, raw)),
    }
}

macro_rules! define_safe_i64_extractor {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_positive_i64(req, $param).map($name))
                }
            }
        )*
    };
}

define_safe_i64_extractor! {
    SafeIDI64 => "id",
    SafeGuardianIdI64 => "guardian_id",
    SafeDocumentIdI64 => "document_id",
    SafePayoutIdI64 => "payout_id",
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_valid_id() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_rejects_non_positive_and_garbage() {
        for raw in ["0", "-3", "abc", "9999999999999999999999"] {
            let req = TestRequest::default().param("id", raw).to_http_request();
            assert!(SafeIDI64::extract(&req).await.is_err(), "{raw}");
        }
    }

    #[actix_web::test]
    async fn test_named_param() {
        let req = TestRequest::default()
            .param("id", "1")
            .param("guardian_id", "7")
            .to_http_request();
        assert_eq!(SafeGuardianIdI64::extract(&req).await.unwrap().0, 7);
    }
}
