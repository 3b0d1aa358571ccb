pub mod login;
pub mod logout;
pub mod oauth;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;
use crate::errors::{Result, SchoolError};
use crate::models::auth::requests::{LoginRequest, OAuthCallbackQuery, RefreshTokenRequest};
use crate::models::auth::responses::LoginResponse;
use crate::models::users::entities::User;
use crate::storage::{AuthStorage, Storage};
use crate::utils::jwt::JwtUtils;
use crate::utils::random_code::generate_opaque_token;

super::define_service!(
    /// 登录、令牌轮换与 OAuth
    AuthService
);

/// 签发完成的会话：响应体与需要写入 cookie 的刷新令牌明文
pub(crate) struct IssuedSession {
    pub response: LoginResponse,
    pub refresh_token: String,
}

pub(crate) fn user_agent(request: &HttpRequest) -> Option<String> {
    request
        .headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.chars().take(255).collect())
}

pub(crate) fn refresh_expires_at(now: i64) -> i64 {
    now + AppConfig::get().jwt.refresh_token_expiry * 24 * 60 * 60
}

pub(crate) fn access_token_for(user: &User) -> Result<String> {
    let roles: Vec<String> = user.roles.iter().map(|r| r.to_string()).collect();
    JwtUtils::generate_access_token(user.id, &roles)
        .map_err(|e| SchoolError::authentication(format!("Failed to sign access token: {e}")))
}

/// 为用户签发 access token 并写入新的刷新令牌
pub(crate) async fn issue_session(
    storage: &dyn Storage,
    user: User,
    request: &HttpRequest,
) -> Result<IssuedSession> {
    let access_token = access_token_for(&user)?;
    let refresh_token = generate_opaque_token();
    let now = chrono::Utc::now().timestamp();

    storage
        .create_refresh_token(
            user.id,
            &JwtUtils::hash_refresh_token(&refresh_token),
            refresh_expires_at(now),
            user_agent(request),
        )
        .await?;

    Ok(IssuedSession {
        response: LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: JwtUtils::access_token_ttl_seconds(),
            user,
        },
        refresh_token,
    })
}

impl AuthService {
    // 邮箱密码登录
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 轮换刷新令牌
    pub async fn refresh_token(
        &self,
        body: RefreshTokenRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, body, request).await
    }

    // 登出
    pub async fn logout(
        &self,
        body: RefreshTokenRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        logout::handle_logout(self, body, request).await
    }

    // 当前用户信息
    pub async fn get_user(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_get_user(self, request).await
    }

    // 跳转到 OAuth 授权页
    pub async fn oauth_redirect(&self) -> ActixResult<HttpResponse> {
        oauth::handle_redirect().await
    }

    // OAuth 回调
    pub async fn oauth_callback(
        &self,
        query: OAuthCallbackQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        oauth::handle_callback(self, query, request).await
    }
}
