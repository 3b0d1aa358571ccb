use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::prospects::requests::{
    CreateProspectNoteRequest, CreateProspectRequest, ProspectListParams,
};
use crate::models::users::entities::UserRole;
use crate::services::ProspectService;
use crate::utils::SafeIDI64;

// 懒加载的全局 ProspectService 实例
static PROSPECT_SERVICE: Lazy<ProspectService> = Lazy::new(ProspectService::new_lazy);

pub async fn list_prospects(
    req: HttpRequest,
    query: web::Query<ProspectListParams>,
) -> ActixResult<HttpResponse> {
    PROSPECT_SERVICE.list_prospects(query.into_inner(), &req).await
}

pub async fn create_prospect(
    req: HttpRequest,
    body: web::Json<CreateProspectRequest>,
) -> ActixResult<HttpResponse> {
    PROSPECT_SERVICE.create_prospect(body.into_inner(), &req).await
}

pub async fn list_notes(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PROSPECT_SERVICE.list_notes(student_id.0, &req).await
}

pub async fn create_note(
    req: HttpRequest,
    student_id: SafeIDI64,
    body: web::Json<CreateProspectNoteRequest>,
) -> ActixResult<HttpResponse> {
    PROSPECT_SERVICE
        .create_note(student_id.0, body.into_inner(), &req)
        .await
}

pub async fn convert_prospect(
    req: HttpRequest,
    student_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    PROSPECT_SERVICE.convert_prospect(student_id.0, &req).await
}

// 配置路由
pub fn configure_prospect_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/prospects")
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_prospects))
            .route("", web::post().to(create_prospect))
            .route("/{id}/notes", web::get().to(list_notes))
            .route("/{id}/notes", web::post().to(create_note))
            .route("/{id}/convert", web::post().to(convert_prospect)),
    );
}
