use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::InstrumentService;
use crate::models::ApiResponse;
use crate::services::error_response;
use crate::storage::InstrumentStorage;

pub async fn list_instruments(
    service: &InstrumentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_instruments().await {
        Ok(instruments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            instruments,
            "Instrument list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to retrieve instruments")),
    }
}
