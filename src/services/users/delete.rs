use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, error_response, invalidate_user_cache, not_found};
use crate::storage::UserStorage;

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if current_user(request).is_some_and(|u| u.id == user_id) {
        return Ok(bad_request(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete current user",
        ));
    }

    // 角色、刷新令牌、通知随用户级联删除
    match storage.delete_user(user_id).await {
        Ok(true) => {
            invalidate_user_cache(request, user_id).await;
            info!("User {} deleted", user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(error_response(&e, "User deletion failed")),
    }
}
