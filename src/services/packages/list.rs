use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PackageService;
use crate::models::ApiResponse;
use crate::models::packages::requests::PackageListParams;
use crate::services::error_response;
use crate::storage::PackageStorage;

pub async fn list_packages(
    service: &PackageService,
    query: PackageListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_packages(query.active_only.unwrap_or(false)).await {
        Ok(packages) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            packages,
            "Package list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to retrieve packages")),
    }
}
