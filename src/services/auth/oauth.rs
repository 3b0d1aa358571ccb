//! OAuth 授权码登录
//!
//! 只允许已有账号通过邮箱匹配登录，不做自动注册。

use actix_web::http::header::LOCATION;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use once_cell::sync::Lazy;
use tracing::{info, warn};

use super::{AuthService, issue_session};
use crate::config::{AppConfig, OAuthConfig};
use crate::errors::{Result, SchoolError};
use crate::models::auth::{entities::OAuthProfile, requests::OAuthCallbackQuery};
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, forbidden, invalidate_user_cache};
use crate::storage::UserStorage;
use crate::utils::jwt::{JwtUtils, OAUTH_STATE_COOKIE};
use crate::utils::validate::normalize_email;

type OAuthClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

// 令牌交换不跟随重定向
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

fn invalid(field: &'static str) -> impl Fn(url::ParseError) -> SchoolError {
    move |e| SchoolError::validation(format!("Invalid oauth.{field}: {e}"))
}

fn build_client(config: &OAuthConfig) -> Result<OAuthClient> {
    Ok(BasicClient::new(ClientId::new(config.client_id.clone()))
        .set_client_secret(ClientSecret::new(config.client_secret.clone()))
        .set_auth_uri(AuthUrl::new(config.auth_url.clone()).map_err(invalid("auth_url"))?)
        .set_token_uri(TokenUrl::new(config.token_url.clone()).map_err(invalid("token_url"))?)
        .set_redirect_uri(
            RedirectUrl::new(config.redirect_url.clone()).map_err(invalid("redirect_url"))?,
        ))
}

fn not_configured() -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
        ErrorCode::OAuthNotConfigured,
        "OAuth login is not configured",
    ))
}

fn oauth_failed(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_oauth_state_cookie())
        .json(ApiResponse::error_empty(ErrorCode::OAuthFailed, message))
}

/// 登录成功后跳回前端的地址，令牌放在 fragment 中
pub fn frontend_redirect_url(frontend: &str, access_token: &str, expires_in: i64) -> String {
    format!(
        "{}/#access_token={access_token}&token_type=Bearer&expires_in={expires_in}",
        frontend.trim_end_matches('/')
    )
}

async fn fetch_profile(userinfo_url: &str, access_token: &str) -> Result<OAuthProfile> {
    let response = HTTP_CLIENT
        .get(userinfo_url)
        .bearer_auth(access_token)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| SchoolError::external_service(format!("Userinfo request failed: {e}")))?;

    response
        .json::<OAuthProfile>()
        .await
        .map_err(|e| SchoolError::external_service(format!("Invalid userinfo response: {e}")))
}

pub async fn handle_redirect() -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    if !config.oauth_enabled() {
        return Ok(not_configured());
    }

    let client = match build_client(&config.oauth) {
        Ok(client) => client,
        Err(e) => return Ok(error_response(&e, "OAuth client configuration failed")),
    };

    let (authorize_url, csrf_state) = client
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::new("openid".to_string()))
        .add_scope(Scope::new("email".to_string()))
        .add_scope(Scope::new("profile".to_string()))
        .url();

    Ok(HttpResponse::Found()
        .insert_header((LOCATION, authorize_url.to_string()))
        .cookie(JwtUtils::create_oauth_state_cookie(csrf_state.secret()))
        .finish())
}

pub async fn handle_callback(
    service: &AuthService,
    query: OAuthCallbackQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    if !config.oauth_enabled() {
        return Ok(not_configured());
    }

    if let Some(error) = query.error {
        warn!("OAuth provider returned error: {}", error);
        return Ok(oauth_failed(format!("OAuth login was not completed: {error}")));
    }

    let (Some(code), Some(state)) = (query.code, query.state) else {
        return Ok(bad_request(ErrorCode::BadRequest, "Missing code or state"));
    };

    let expected = request
        .cookie(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value().to_string());
    if expected.as_deref() != Some(state.as_str()) {
        return Ok(HttpResponse::BadRequest()
            .cookie(JwtUtils::create_empty_oauth_state_cookie())
            .json(ApiResponse::error_empty(
                ErrorCode::OAuthStateMismatch,
                "OAuth state mismatch",
            )));
    }

    let client = match build_client(&config.oauth) {
        Ok(client) => client,
        Err(e) => return Ok(error_response(&e, "OAuth client configuration failed")),
    };

    let token = match client
        .exchange_code(AuthorizationCode::new(code))
        .request_async(&*HTTP_CLIENT)
        .await
    {
        Ok(token) => token,
        Err(e) => {
            warn!("OAuth code exchange failed: {}", e);
            return Ok(oauth_failed("OAuth code exchange failed"));
        }
    };

    let profile = match fetch_profile(&config.oauth.userinfo_url, token.access_token().secret()).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!("{}", e);
            return Ok(oauth_failed("Failed to fetch OAuth profile"));
        }
    };
    if profile.email_verified == Some(false) {
        return Ok(forbidden(ErrorCode::OAuthFailed, "OAuth email is not verified"));
    }

    let storage = service.get_storage(request);
    let email = normalize_email(&profile.email);
    let mut user = match storage.get_user_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!("OAuth login rejected for unknown email {}", email);
            return Ok(forbidden(
                ErrorCode::AuthFailed,
                "No account is registered for this email",
            ));
        }
        Err(e) => return Ok(error_response(&e, "OAuth login failed")),
    };
    if !user.is_active() {
        return Ok(forbidden(ErrorCode::AccountDisabled, "Account is disabled"));
    }

    // 首次 OAuth 登录时补全头像
    if user.avatar_url.is_none()
        && let Some(picture) = profile.picture
    {
        let update = UpdateUserRequest {
            email: None,
            password: None,
            display_name: None,
            avatar_url: Some(picture),
            status: None,
        };
        match storage.update_user(user.id, update).await {
            Ok(Some(updated)) => {
                user = updated;
                invalidate_user_cache(request, user.id).await;
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to store avatar for user {}: {}", user.id, e),
        }
    }

    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    let user_id = user.id;
    match issue_session(storage.as_ref(), user, request).await {
        Ok(session) => {
            info!("User {} logged in via OAuth", user_id);
            let location = frontend_redirect_url(
                &config.frontend.url,
                &session.response.access_token,
                session.response.expires_in,
            );
            Ok(HttpResponse::Found()
                .insert_header((LOCATION, location))
                .cookie(JwtUtils::create_refresh_token_cookie(&session.refresh_token, true))
                .cookie(JwtUtils::create_empty_oauth_state_cookie())
                .finish())
        }
        Err(e) => Ok(error_response(&e, "OAuth login failed, unable to issue token")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OAuthConfig {
        OAuthConfig {
            client_id: "client".into(),
            client_secret: "secret".into(),
            auth_url: "https://accounts.example.com/o/oauth2/auth".into(),
            token_url: "https://oauth2.example.com/token".into(),
            userinfo_url: "https://openidconnect.example.com/v1/userinfo".into(),
            redirect_url: "http://localhost:8080/api/auth/oauth/google/callback".into(),
        }
    }

    #[test]
    fn test_authorize_url_carries_state_and_redirect() {
        let client = build_client(&config()).unwrap();
        let (url, state) = client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("email".to_string()))
            .url();
        let url = url.to_string();
        assert!(url.starts_with("https://accounts.example.com/o/oauth2/auth?"));
        assert!(url.contains(&format!("state={}", state.secret())));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080"));
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let mut bad = config();
        bad.token_url = "not a url".into();
        assert!(build_client(&bad).is_err());
    }

    #[test]
    fn test_frontend_redirect_url() {
        assert_eq!(
            frontend_redirect_url("https://app.school.test/", "abc", 900),
            "https://app.school.test/#access_token=abc&token_type=Bearer&expires_in=900"
        );
    }
}
