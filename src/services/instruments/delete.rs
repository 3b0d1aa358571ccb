use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::InstrumentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, not_found};
use crate::storage::InstrumentStorage;

pub async fn delete_instrument(
    service: &InstrumentService,
    instrument_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.count_instrument_usage(instrument_id).await {
        Ok(0) => {}
        Ok(_) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::InstrumentInUse,
                "Instrument is used by batches, enrollments or packages",
            )));
        }
        Err(e) => return Ok(error_response(&e, "Failed to delete instrument")),
    }

    match storage.delete_instrument(instrument_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Instrument deleted successfully"))),
        Ok(false) => Ok(not_found(ErrorCode::InstrumentNotFound, "Instrument not found")),
        Err(e) => Ok(error_response(&e, "Failed to delete instrument")),
    }
}
