use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::models::ApiResponse;
use crate::models::notifications::requests::NotificationListParams;
use crate::services::{current_user, error_response, unauthorized};
use crate::storage::NotificationStorage;

pub async fn list_notifications(
    service: &NotificationService,
    query: NotificationListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = current_user(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request);

    match storage
        .list_notifications_with_pagination(
            user.id,
            query.unread_only.unwrap_or(false),
            query.pagination.page,
            query.pagination.size,
        )
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Notifications retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to list notifications")),
    }
}
