use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::InstrumentService;
use crate::models::instruments::requests::CreateInstrumentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, is_unique_violation};
use crate::storage::InstrumentStorage;
use crate::utils::validate::validate_name;

fn already_exists() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::InstrumentAlreadyExists,
        "Instrument already exists",
    ))
}

pub async fn create_instrument(
    service: &InstrumentService,
    body: CreateInstrumentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_name(&body.name) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    let name = body.name.trim();

    let storage = service.get_storage(request);
    match storage.get_instrument_by_name(name).await {
        Ok(Some(_)) => return Ok(already_exists()),
        Ok(None) => {}
        Err(e) => return Ok(error_response(&e, "Instrument creation failed")),
    }

    match storage.create_instrument(name).await {
        Ok(instrument) => Ok(HttpResponse::Created().json(ApiResponse::success(
            instrument,
            "Instrument created successfully",
        ))),
        Err(e) if is_unique_violation(&e) => Ok(already_exists()),
        Err(e) => Ok(error_response(&e, "Instrument creation failed")),
    }
}
