use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use super::{AuthService, access_token_for, refresh_expires_at, user_agent};
use crate::models::auth::{
    requests::RefreshTokenRequest,
    responses::{RefreshTokenResponse, UserInfoResponse},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response, unauthorized};
use crate::storage::{AuthStorage, UserStorage};
use crate::utils::jwt::JwtUtils;
use crate::utils::random_code::generate_opaque_token;

/// 优先读取 cookie，其次读取请求体
pub(crate) fn presented_refresh_token(
    request: &HttpRequest,
    body: RefreshTokenRequest,
) -> Option<String> {
    JwtUtils::extract_refresh_token_from_cookie(request).or_else(|| {
        body.refresh_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

fn rejected(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(code, message))
}

fn invalid_token() -> HttpResponse {
    rejected(
        ErrorCode::RefreshTokenInvalid,
        "Login expired or invalid, please login again",
    )
}

pub async fn handle_refresh_token(
    service: &AuthService,
    body: RefreshTokenRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(presented) = presented_refresh_token(request, body) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request);

    let token = match storage
        .get_refresh_token_by_hash(&JwtUtils::hash_refresh_token(&presented))
        .await
    {
        Ok(Some(token)) => token,
        Ok(None) => return Ok(invalid_token()),
        Err(e) => return Ok(error_response(&e, "Failed to refresh token")),
    };

    // 已吊销的令牌再次出现，视为被盗用，吊销该用户全部令牌
    if token.is_revoked() {
        warn!(
            "Revoked refresh token {} presented again, revoking all sessions of user {}",
            token.id, token.user_id
        );
        if let Err(e) = storage.revoke_all_user_tokens(token.user_id).await {
            error!("Failed to revoke tokens of user {}: {}", token.user_id, e);
        }
        return Ok(rejected(
            ErrorCode::RefreshTokenReused,
            "Refresh token reuse detected, please login again",
        ));
    }

    let now = chrono::Utc::now().timestamp();
    if token.is_expired(now) {
        return Ok(invalid_token());
    }

    let user = match storage.get_user_by_id(token.user_id).await {
        Ok(Some(user)) if user.is_active() => user,
        Ok(_) => {
            if let Err(e) = storage.revoke_refresh_token(token.id).await {
                error!("Failed to revoke refresh token {}: {}", token.id, e);
            }
            return Ok(invalid_token());
        }
        Err(e) => return Ok(error_response(&e, "Failed to refresh token")),
    };

    let new_token = generate_opaque_token();
    match storage
        .rotate_refresh_token(
            &token,
            &JwtUtils::hash_refresh_token(&new_token),
            refresh_expires_at(now),
            user_agent(request),
        )
        .await
    {
        Ok(Some(_)) => {}
        // 并发请求先一步完成了轮换
        Ok(None) => {
            return Ok(rejected(
                ErrorCode::RefreshTokenReused,
                "Refresh token already used, please login again",
            ));
        }
        Err(e) => return Ok(error_response(&e, "Failed to refresh token")),
    }

    let access_token = match access_token_for(&user) {
        Ok(token) => token,
        Err(e) => return Ok(error_response(&e, "Failed to refresh token")),
    };
    info!("Refresh token rotated for user {}", user.id);

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_refresh_token_cookie(&new_token, true))
        .json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                token_type: "Bearer".to_string(),
                expires_in: JwtUtils::access_token_ttl_seconds(),
            },
            "Token refreshed successfully",
        )))
}

pub async fn handle_get_user(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match current_user(request) {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "User information retrieved successfully",
        ))),
        None => Ok(unauthorized()),
    }
}
