pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod roles;
pub mod teacher_link;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::users::entities::UserRole;
use crate::models::users::requests::{
    CreateUserRequest, LinkTeacherRequest, UpdateUserRequest, UpdateUserRolesRequest,
    UserListParams,
};

super::define_service!(
    /// 账号管理（管理员）
    UserService
);

/// 去重并保持顺序，至少一个角色
pub(crate) fn normalize_roles(roles: Vec<UserRole>) -> Option<Vec<UserRole>> {
    let mut unique = Vec::with_capacity(roles.len());
    for role in roles {
        if !unique.contains(&role) {
            unique.push(role);
        }
    }
    (!unique.is_empty()).then_some(unique)
}

impl UserService {
    // 获取用户列表
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 创建用户
    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    // 根据ID获取用户
    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    // 更新用户信息
    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    // 删除用户
    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }

    // 替换角色
    pub async fn update_roles(
        &self,
        user_id: i64,
        body: UpdateUserRolesRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        roles::update_roles(self, user_id, body, request).await
    }

    // 关联教师档案
    pub async fn link_teacher(
        &self,
        user_id: i64,
        body: LinkTeacherRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        teacher_link::link_teacher(self, user_id, body, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_roles() {
        assert_eq!(
            normalize_roles(vec![UserRole::Teacher, UserRole::Admin, UserRole::Teacher]),
            Some(vec![UserRole::Teacher, UserRole::Admin])
        );
        assert_eq!(normalize_roles(vec![]), None);
    }
}
