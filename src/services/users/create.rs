use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, normalize_roles};
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::{bad_request, error_response, is_unique_violation};
use crate::storage::UserStorage;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    normalize_email, validate_email, validate_name, validate_password_simple,
};

fn email_taken() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::UserEmailAlreadyExists,
        "Email already exists",
    ))
}

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 验证显示名称
    if let Err(msg) = validate_name(&user_data.display_name) {
        return Ok(bad_request(ErrorCode::UserNameInvalid, msg));
    }
    user_data.display_name = user_data.display_name.trim().to_string();

    // 验证邮箱
    user_data.email = normalize_email(&user_data.email);
    if let Err(msg) = validate_email(&user_data.email) {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }

    user_data.roles = match normalize_roles(std::mem::take(&mut user_data.roles)) {
        Some(roles) => roles,
        None => {
            return Ok(bad_request(
                ErrorCode::UserRolesInvalid,
                "At least one role is required",
            ));
        }
    };

    // 没有密码的账号只能通过 OAuth 登录
    if let Some(password) = user_data.password.take() {
        if let Err(msg) = validate_password_simple(&password) {
            return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
        }
        match hash_password(&password) {
            Ok(hash) => user_data.password = Some(hash),
            Err(e) => return Ok(error_response(&e, "Password hashing failed")),
        }
    }

    let storage = service.get_storage(request);

    match storage.get_user_by_email(&user_data.email).await {
        Ok(Some(_)) => return Ok(email_taken()),
        Ok(None) => {}
        Err(e) => return Ok(error_response(&e, "User creation failed")),
    }

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("User {} created with roles {:?}", user.id, user.roles);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(UserResponse { user }, "User created successfully")))
        }
        Err(e) if is_unique_violation(&e) => Ok(email_taken()),
        Err(e) => Ok(error_response(&e, "User creation failed")),
    }
}
