use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, PathError, QueryPayloadError},
};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(kind: &str, detail: String, req: &HttpRequest) -> actix_web::Error {
    debug!("{} rejected for {}: {}", kind, req.path(), detail);
    let message = format!("{kind}: {detail}");
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

/// JSON 请求体解析失败
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    bad_request("Invalid JSON body", err.to_string(), req)
}

/// 查询参数解析失败
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    bad_request("Invalid query parameters", err.to_string(), req)
}

/// 路径参数解析失败
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    bad_request("Invalid path parameters", err.to_string(), req)
}
