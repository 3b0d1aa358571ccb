use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::packages::requests::{
    CreatePackageRequest, PackageListParams, UpdatePackageRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::PackageService;
use crate::utils::SafeIDI64;

// 懒加载的全局 PackageService 实例
static PACKAGE_SERVICE: Lazy<PackageService> = Lazy::new(PackageService::new_lazy);

pub async fn list_packages(
    req: HttpRequest,
    query: web::Query<PackageListParams>,
) -> ActixResult<HttpResponse> {
    PACKAGE_SERVICE.list_packages(query.into_inner(), &req).await
}

pub async fn create_package(
    req: HttpRequest,
    body: web::Json<CreatePackageRequest>,
) -> ActixResult<HttpResponse> {
    PACKAGE_SERVICE.create_package(body.into_inner(), &req).await
}

pub async fn update_package(
    req: HttpRequest,
    package_id: SafeIDI64,
    body: web::Json<UpdatePackageRequest>,
) -> ActixResult<HttpResponse> {
    PACKAGE_SERVICE
        .update_package(package_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_package(req: HttpRequest, package_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PACKAGE_SERVICE.delete_package(package_id.0, &req).await
}

// 配置路由
pub fn configure_package_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/packages")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_packages))
                    .route(
                        web::post()
                            .to(create_package)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::put()
                            .to(update_package)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_package)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
