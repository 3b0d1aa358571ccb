use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProspectService;
use crate::models::ApiResponse;
use crate::models::prospects::requests::ProspectListParams;
use crate::models::students::entities::StudentStatus;
use crate::models::students::requests::StudentListQuery;
use crate::services::error_response;
use crate::storage::StudentStorage;

pub async fn list_prospects(
    service: &ProspectService,
    query: ProspectListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let list_query = StudentListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        status: Some(StudentStatus::Prospect),
        search: query.search,
    };

    match storage.list_students_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Prospect list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to retrieve prospects")),
    }
}
