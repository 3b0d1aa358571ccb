use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::{AttendanceDateQuery, MarkAttendanceRequest};
use crate::models::batches::requests::{BatchListParams, CreateBatchRequest, UpdateBatchRequest};
use crate::models::users::entities::UserRole;
use crate::services::BatchService;
use crate::utils::SafeIDI64;

// 懒加载的全局 BatchService 实例
static BATCH_SERVICE: Lazy<BatchService> = Lazy::new(BatchService::new_lazy);

pub async fn list_batches(
    req: HttpRequest,
    query: web::Query<BatchListParams>,
) -> ActixResult<HttpResponse> {
    BATCH_SERVICE.list_batches(query.into_inner(), &req).await
}

pub async fn create_batch(
    req: HttpRequest,
    body: web::Json<CreateBatchRequest>,
) -> ActixResult<HttpResponse> {
    BATCH_SERVICE.create_batch(body.into_inner(), &req).await
}

pub async fn get_batch(req: HttpRequest, batch_id: SafeIDI64) -> ActixResult<HttpResponse> {
    BATCH_SERVICE.get_batch(batch_id.0, &req).await
}

pub async fn update_batch(
    req: HttpRequest,
    batch_id: SafeIDI64,
    body: web::Json<UpdateBatchRequest>,
) -> ActixResult<HttpResponse> {
    BATCH_SERVICE
        .update_batch(batch_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_batch(req: HttpRequest, batch_id: SafeIDI64) -> ActixResult<HttpResponse> {
    BATCH_SERVICE.delete_batch(batch_id.0, &req).await
}

pub async fn get_roster(req: HttpRequest, batch_id: SafeIDI64) -> ActixResult<HttpResponse> {
    BATCH_SERVICE.get_roster(batch_id.0, &req).await
}

pub async fn mark_attendance(
    req: HttpRequest,
    batch_id: SafeIDI64,
    body: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    BATCH_SERVICE
        .mark_attendance(batch_id.0, body.into_inner(), &req)
        .await
}

pub async fn get_attendance(
    req: HttpRequest,
    batch_id: SafeIDI64,
    query: web::Query<AttendanceDateQuery>,
) -> ActixResult<HttpResponse> {
    BATCH_SERVICE
        .get_attendance(batch_id.0, query.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_batch_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/batches")
            .wrap(middlewares::RequireRole::new_any(UserRole::all_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 教师只返回自己的班次（业务层过滤）
                    .route(web::get().to(list_batches))
                    .route(
                        web::post()
                            .to(create_batch)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_batch))
                    .route(
                        web::put()
                            .to(update_batch)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_batch)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(web::resource("/{id}/roster").route(web::get().to(get_roster)))
            .service(
                web::resource("/{id}/attendance")
                    // 教师只能为自己的班次点当天的名（业务层校验）
                    .route(web::get().to(get_attendance))
                    .route(web::post().to(mark_attendance)),
            ),
    );
}
