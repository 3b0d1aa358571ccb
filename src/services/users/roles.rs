use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, normalize_roles};
use crate::models::users::entities::UserRole;
use crate::models::users::{requests::UpdateUserRolesRequest, responses::UserResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, error_response, invalidate_user_cache, not_found};
use crate::storage::UserStorage;

pub async fn update_roles(
    service: &UserService,
    user_id: i64,
    body: UpdateUserRolesRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(roles) = normalize_roles(body.roles) else {
        return Ok(bad_request(
            ErrorCode::UserRolesInvalid,
            "At least one role is required",
        ));
    };

    // 防止管理员把自己降级后无人可管理
    if current_user(request).is_some_and(|u| u.id == user_id) && !roles.contains(&UserRole::Admin)
    {
        return Ok(bad_request(
            ErrorCode::UserRolesInvalid,
            "Cannot remove the admin role from the current user",
        ));
    }

    let storage = service.get_storage(request);
    match storage.replace_user_roles(user_id, roles).await {
        Ok(Some(user)) => {
            invalidate_user_cache(request, user_id).await;
            info!("Roles of user {} set to {:?}", user_id, user.roles);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "User roles updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(error_response(&e, "Failed to update user roles")),
    }
}
