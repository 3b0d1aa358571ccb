use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::users::entities::UserStatus;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::UpdateUserRequest, responses::UserResponse},
};
use crate::services::{
    bad_request, current_user, error_response, invalidate_user_cache, is_unique_violation,
    not_found,
};
use crate::storage::UserStorage;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    normalize_email, validate_email, validate_name, validate_password_simple,
};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(name) = update_data.display_name.take() {
        if let Err(msg) = validate_name(&name) {
            return Ok(bad_request(ErrorCode::UserNameInvalid, msg));
        }
        update_data.display_name = Some(name.trim().to_string());
    }

    if let Some(email) = update_data.email.take() {
        let email = normalize_email(&email);
        if let Err(msg) = validate_email(&email) {
            return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
        }
        match storage.get_user_by_email(&email).await {
            Ok(Some(existing)) if existing.id != user_id => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::UserEmailAlreadyExists,
                    "Email already exists",
                )));
            }
            Ok(_) => {}
            Err(e) => return Ok(error_response(&e, "Failed to update user information")),
        }
        update_data.email = Some(email);
    }

    if let Some(password) = update_data.password.take() {
        if let Err(msg) = validate_password_simple(&password) {
            return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
        }
        match hash_password(&password) {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => return Ok(error_response(&e, "Password hashing failed")),
        }
    }

    // 不能停用自己
    if let Some(status) = update_data.status
        && status != UserStatus::Active
        && current_user(request).is_some_and(|u| u.id == user_id)
    {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "Cannot deactivate the current user",
        ));
    }

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => {
            invalidate_user_cache(request, user_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "User information updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) if is_unique_violation(&e) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserEmailAlreadyExists, "Email already exists"),
        )),
        Err(e) => Ok(error_response(&e, "Failed to update user information")),
    }
}
