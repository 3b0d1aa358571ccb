use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{PackageService, validate_package_numbers};
use crate::models::packages::requests::CreatePackageRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, is_unique_violation, not_found};
use crate::storage::{InstrumentStorage, PackageStorage};
use crate::utils::validate::validate_name;

fn already_exists() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::PackageAlreadyExists,
        "Package name already exists",
    ))
}

pub async fn create_package(
    service: &PackageService,
    mut body: CreatePackageRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_name(&body.name) {
        return Ok(bad_request(ErrorCode::PackageInvalid, msg));
    }
    body.name = body.name.trim().to_string();
    if let Err(msg) = validate_package_numbers(
        Some(body.classes_count),
        Some(body.price),
        Some(body.validity_days),
    ) {
        return Ok(bad_request(ErrorCode::PackageInvalid, msg));
    }

    let storage = service.get_storage(request);

    if let Some(instrument_id) = body.instrument_id {
        match storage.get_instrument_by_id(instrument_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(not_found(ErrorCode::InstrumentNotFound, "Instrument not found"));
            }
            Err(e) => return Ok(error_response(&e, "Package creation failed")),
        }
    }
    match storage.get_package_by_name(&body.name).await {
        Ok(Some(_)) => return Ok(already_exists()),
        Ok(None) => {}
        Err(e) => return Ok(error_response(&e, "Package creation failed")),
    }

    match storage.create_package(body).await {
        Ok(package) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(package, "Package created successfully"))),
        Err(e) if is_unique_violation(&e) => Ok(already_exists()),
        Err(e) => Ok(error_response(&e, "Package creation failed")),
    }
}
