use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::instruments::requests::CreateInstrumentRequest;
use crate::models::users::entities::UserRole;
use crate::services::InstrumentService;
use crate::utils::SafeIDI64;

// 懒加载的全局 InstrumentService 实例
static INSTRUMENT_SERVICE: Lazy<InstrumentService> = Lazy::new(InstrumentService::new_lazy);

pub async fn list_instruments(req: HttpRequest) -> ActixResult<HttpResponse> {
    INSTRUMENT_SERVICE.list_instruments(&req).await
}

pub async fn create_instrument(
    req: HttpRequest,
    body: web::Json<CreateInstrumentRequest>,
) -> ActixResult<HttpResponse> {
    INSTRUMENT_SERVICE
        .create_instrument(body.into_inner(), &req)
        .await
}

pub async fn delete_instrument(
    req: HttpRequest,
    instrument_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    INSTRUMENT_SERVICE
        .delete_instrument(instrument_id.0, &req)
        .await
}

// 配置路由
pub fn configure_instrument_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/instruments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_instruments))
                    .route(
                        web::post()
                            .to(create_instrument)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}").route(
                    web::delete()
                        .to(delete_instrument)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );
}
