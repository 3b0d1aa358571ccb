use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::AuthService;
use super::token::presented_refresh_token;
use crate::models::ApiResponse;
use crate::models::auth::requests::RefreshTokenRequest;
use crate::storage::AuthStorage;
use crate::utils::jwt::JwtUtils;

/// 吊销当前刷新令牌并清除 cookie，令牌无效时同样返回成功
pub async fn handle_logout(
    service: &AuthService,
    body: RefreshTokenRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(presented) = presented_refresh_token(request, body) {
        let storage = service.get_storage(request);
        match storage
            .get_refresh_token_by_hash(&JwtUtils::hash_refresh_token(&presented))
            .await
        {
            Ok(Some(token)) if !token.is_revoked() => {
                if let Err(e) = storage.revoke_refresh_token(token.id).await {
                    warn!("Failed to revoke refresh token {}: {}", token.id, e);
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Failed to look up refresh token on logout: {}", e),
        }
    }

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logout successful")))
}
