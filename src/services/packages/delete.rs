use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PackageService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, is_foreign_key_violation, not_found};
use crate::storage::PackageStorage;

pub async fn delete_package(
    service: &PackageService,
    package_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_package(package_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Package deleted successfully"))),
        Ok(false) => Ok(not_found(ErrorCode::PackageNotFound, "Package not found")),
        // 已售出的课程包只能停用
        Err(e) if is_foreign_key_violation(&e) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::PackageInvalid,
                "Package is referenced by payments or enrollments, deactivate it instead",
            ),
        )),
        Err(e) => Ok(error_response(&e, "Failed to delete package")),
    }
}
