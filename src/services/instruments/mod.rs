pub mod create;
pub mod delete;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::instruments::requests::CreateInstrumentRequest;

super::define_service!(InstrumentService);

impl InstrumentService {
    pub async fn list_instruments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_instruments(self, request).await
    }

    pub async fn create_instrument(
        &self,
        body: CreateInstrumentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_instrument(self, body, request).await
    }

    pub async fn delete_instrument(
        &self,
        instrument_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_instrument(self, instrument_id, request).await
    }
}
