use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{AuthService, issue_session};
use crate::models::{ApiResponse, ErrorCode, auth::requests::LoginRequest};
use crate::services::{error_response, forbidden};
use crate::storage::UserStorage;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;
use crate::utils::validate::normalize_email;

fn auth_failed() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Email or password is incorrect",
    ))
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let email = normalize_email(&login_request.email);

    // 1. 根据邮箱获取用户
    let user = match storage.get_user_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(auth_failed()),
        Err(e) => return Ok(error_response(&e, "Login failed")),
    };

    // 2. 验证密码，仅 OAuth 账号没有密码
    let password_ok = user
        .password_hash
        .as_deref()
        .is_some_and(|hash| verify_password(&login_request.password, hash));
    if !password_ok {
        return Ok(auth_failed());
    }

    if !user.is_active() {
        return Ok(forbidden(ErrorCode::AccountDisabled, "Account is disabled"));
    }

    // 3. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    // 4. 签发令牌
    let user_id = user.id;
    match issue_session(storage.as_ref(), user, request).await {
        Ok(session) => {
            info!("User {} logged in", user_id);
            let cookie =
                JwtUtils::create_refresh_token_cookie(&session.refresh_token, login_request.remember_me);
            Ok(HttpResponse::Ok()
                .cookie(cookie)
                .json(ApiResponse::success(session.response, "Login successful")))
        }
        Err(e) => Ok(error_response(&e, "Login failed, unable to issue token")),
    }
}
