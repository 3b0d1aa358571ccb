use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::models::notifications::responses::UnreadCountResponse;
use crate::models::ApiResponse;
use crate::services::{current_user, error_response, unauthorized};
use crate::storage::NotificationStorage;

pub async fn get_unread_count(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = current_user(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request);

    match storage.count_unread_notifications(user.id).await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UnreadCountResponse {
                unread_count: count,
            },
            "Unread count retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to count unread notifications")),
    }
}
