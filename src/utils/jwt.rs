use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub roles: Vec<String>, // 签发时的角色，仅供前端展示，鉴权以数据库为准
    pub token_type: String, // 固定为 "access"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    /// access token 有效期（秒）
    pub fn access_token_ttl_seconds() -> i64 {
        AppConfig::get().jwt.access_token_expiry * 60
    }

    // 生成 Access Token
    pub fn generate_access_token(
        user_id: i64,
        roles: &[String],
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::generate_token_with_expiry(
            user_id,
            roles,
            chrono::Duration::minutes(config.jwt.access_token_expiry),
        )
    }

    // 生成带自定义过期时间的 Token
    pub fn generate_token_with_expiry(
        user_id: i64,
        roles: &[String],
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            roles: roles.to_vec(),
            token_type: "access".to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let secret = Self::get_secret();
        let encoding_key = EncodingKey::from_secret(secret.as_ref());

        encode(&Header::default(), &claims, &encoding_key)
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let secret = Self::get_secret();
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let validation = Validation::default();

        let claims =
            decode::<Claims>(token, &decoding_key, &validation).map(|data| data.claims)?;
        if claims.token_type != "access" {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }

    /// 刷新令牌摘要，数据库只保存该值
    pub fn hash_refresh_token(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    /// 创建 Refresh Token Cookie，remember 为 false 时为会话 cookie
    pub fn create_refresh_token_cookie(refresh_token: &str, remember: bool) -> Cookie<'static> {
        let config = AppConfig::get();
        let mut builder = Cookie::build(REFRESH_TOKEN_COOKIE, refresh_token.to_string())
            .path("/api/auth")
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(config.is_production()); // 生产环境下使用 HTTPS
        if remember {
            builder = builder.max_age(actix_web::cookie::time::Duration::days(
                config.jwt.refresh_token_expiry,
            ));
        }
        builder.finish()
    }

    /// 创建空的 Refresh Token Cookie（用于注销）
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        let config = AppConfig::get();
        Cookie::build(REFRESH_TOKEN_COOKIE, "")
            .path("/api/auth")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(config.is_production())
            .finish()
    }

    /// OAuth state cookie，回调需要跨站跳转，因此使用 Lax
    pub fn create_oauth_state_cookie(state: &str) -> Cookie<'static> {
        let config = AppConfig::get();
        Cookie::build(OAUTH_STATE_COOKIE, state.to_string())
            .path("/api/auth/oauth")
            .max_age(actix_web::cookie::time::Duration::minutes(10))
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(config.is_production())
            .finish()
    }

    pub fn create_empty_oauth_state_cookie() -> Cookie<'static> {
        Cookie::build(OAUTH_STATE_COOKIE, "")
            .path("/api/auth/oauth")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .http_only(true)
            .finish()
    }

    /// 从请求中提取 Refresh Token
    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_round_trip() {
        let roles = vec!["admin".to_string(), "teacher".to_string()];
        let token = JwtUtils::generate_access_token(42, &roles).unwrap();
        let claims = JwtUtils::verify_access_token(&token).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.roles, roles);
    }

    #[test]
    fn test_expired_token_rejected() {
        let token =
            JwtUtils::generate_token_with_expiry(1, &[], chrono::Duration::minutes(-10)).unwrap();
        assert!(JwtUtils::verify_access_token(&token).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = JwtUtils::generate_access_token(7, &[]).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(JwtUtils::verify_access_token(&tampered).is_err());
    }

    #[test]
    fn test_refresh_token_hash_is_stable() {
        let a = JwtUtils::hash_refresh_token("abc");
        assert_eq!(a, JwtUtils::hash_refresh_token("abc"));
        assert_ne!(a, JwtUtils::hash_refresh_token("abd"));
        assert_eq!(a.len(), 64);
    }
}
