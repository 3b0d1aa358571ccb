use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::auth::requests::{LoginRequest, OAuthCallbackQuery, RefreshTokenRequest};
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(
    req: HttpRequest,
    user_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(user_data.into_inner(), &req).await
}

// 请求体可选，优先读取 cookie
pub async fn refresh_token(
    req: HttpRequest,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(|b| b.into_inner()).unwrap_or_default();
    AUTH_SERVICE.refresh_token(body, &req).await
}

pub async fn logout(
    req: HttpRequest,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(|b| b.into_inner()).unwrap_or_default();
    AUTH_SERVICE.logout(body, &req).await
}

pub async fn oauth_redirect() -> ActixResult<HttpResponse> {
    AUTH_SERVICE.oauth_redirect().await
}

pub async fn oauth_callback(
    req: HttpRequest,
    query: web::Query<OAuthCallbackQuery>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.oauth_callback(query.into_inner(), &req).await
}

pub async fn get_user(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.get_user(&request).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .service(
                web::resource("/login")
                    .wrap(RateLimit::login())
                    .route(web::post().to(login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(RateLimit::refresh_token())
                    .route(web::post().to(refresh_token)),
            )
            .service(web::resource("/logout").route(web::post().to(logout)))
            .service(
                web::resource("/oauth/google")
                    .wrap(RateLimit::oauth())
                    .route(web::get().to(oauth_redirect)),
            )
            .service(
                web::resource("/oauth/google/callback")
                    .wrap(RateLimit::oauth())
                    .route(web::get().to(oauth_callback)),
            )
            .service(
                web::resource("/me")
                    .wrap(middlewares::RequireJWT)
                    .route(web::get().to(get_user)),
            ),
    );
}
