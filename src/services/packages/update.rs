use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{PackageService, validate_package_numbers};
use crate::models::packages::requests::UpdatePackageRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, is_unique_violation, not_found};
use crate::storage::{InstrumentStorage, PackageStorage};
use crate::utils::validate::validate_name;

pub async fn update_package(
    service: &PackageService,
    package_id: i64,
    mut body: UpdatePackageRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = body.name.take() {
        if let Err(msg) = validate_name(&name) {
            return Ok(bad_request(ErrorCode::PackageInvalid, msg));
        }
        body.name = Some(name.trim().to_string());
    }
    if let Err(msg) = validate_package_numbers(body.classes_count, body.price, body.validity_days) {
        return Ok(bad_request(ErrorCode::PackageInvalid, msg));
    }

    let storage = service.get_storage(request);

    if let Some(instrument_id) = body.instrument_id {
        match storage.get_instrument_by_id(instrument_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(not_found(ErrorCode::InstrumentNotFound, "Instrument not found"));
            }
            Err(e) => return Ok(error_response(&e, "Failed to update package")),
        }
    }
    if let Some(name) = body.name.as_deref() {
        match storage.get_package_by_name(name).await {
            Ok(Some(existing)) if existing.id != package_id => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::PackageAlreadyExists,
                    "Package name already exists",
                )));
            }
            Ok(_) => {}
            Err(e) => return Ok(error_response(&e, "Failed to update package")),
        }
    }

    match storage.update_package(package_id, body).await {
        Ok(Some(package)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            package,
            "Package updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::PackageNotFound, "Package not found")),
        Err(e) if is_unique_violation(&e) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::PackageAlreadyExists, "Package name already exists"),
        )),
        Err(e) => Ok(error_response(&e, "Failed to update package")),
    }
}
