//! 用户存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, db_err, normalize_page, now_ts};
use crate::entity::teacher_users::{
    ActiveModel as TeacherUserActiveModel, Column as TeacherUserColumn, Entity as TeacherUsers,
};
use crate::entity::user_roles::{
    ActiveModel as RoleActiveModel, Column as RoleColumn, Entity as UserRoles,
};
use crate::entity::users::{ActiveModel, Column, Entity as Users, Model};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::UserStorage;
use crate::utils::like_contains;
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 批量加载用户的角色与教师关联
    async fn hydrate_users<C: ConnectionTrait>(db: &C, models: Vec<Model>) -> Result<Vec<User>> {
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut roles: HashMap<i64, Vec<UserRole>> = HashMap::new();
        for row in UserRoles::find()
            .filter(RoleColumn::UserId.is_in(ids.clone()))
            .order_by_asc(RoleColumn::Id)
            .all(db)
            .await
            .map_err(db_err("查询用户角色失败"))?
        {
            if let Ok(role) = row.role.parse::<UserRole>() {
                roles.entry(row.user_id).or_default().push(role);
            }
        }

        let teachers: HashMap<i64, i64> = TeacherUsers::find()
            .filter(TeacherUserColumn::UserId.is_in(ids))
            .all(db)
            .await
            .map_err(db_err("查询教师关联失败"))?
            .into_iter()
            .map(|row| (row.user_id, row.teacher_id))
            .collect();

        Ok(models
            .into_iter()
            .map(|m| {
                let user_roles = roles.remove(&m.id).unwrap_or_default();
                let teacher_id = teachers.get(&m.id).copied();
                m.into_user(user_roles, teacher_id)
            })
            .collect())
    }

    async fn hydrate_user<C: ConnectionTrait>(db: &C, model: Option<Model>) -> Result<Option<User>> {
        match model {
            Some(m) => Ok(Self::hydrate_users(db, vec![m]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 写入角色集合，调用方负责先清理旧角色
    async fn insert_roles<C: ConnectionTrait>(db: &C, user_id: i64, roles: &[UserRole]) -> Result<()> {
        let now = now_ts();
        let mut seen = Vec::with_capacity(roles.len());
        for role in roles {
            if seen.contains(role) {
                continue;
            }
            seen.push(*role);
            RoleActiveModel {
                user_id: Set(user_id),
                role: Set(role.to_string()),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await
            .map_err(db_err("写入用户角色失败"))?;
        }
        Ok(())
    }
}

#[async_trait]
impl UserStorage for SeaOrmStorage {
    async fn create_user(&self, req: CreateUserRequest) -> Result<User> {
        let now = now_ts();
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let model = ActiveModel {
            email: Set(req.email),
            password_hash: Set(req.password),
            display_name: Set(req.display_name),
            avatar_url: Set(req.avatar_url),
            status: Set(UserStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err("创建用户失败"))?;

        Self::insert_roles(&txn, model.id, &req.roles).await?;
        let user = Self::hydrate_user(&txn, Some(model)).await?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        user.ok_or_else(|| crate::errors::SchoolError::database_operation("创建用户后读取失败"))
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let model = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询用户失败"))?;
        Self::hydrate_user(&self.db, model).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let model = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err("查询用户失败"))?;
        Self::hydrate_user(&self.db, model).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Users::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(Column::Email.like(like_contains(search.trim())))
                    .add(Column::DisplayName.like(like_contains(search.trim()))),
            );
        }

        // 角色筛选通过子查询
        if let Some(role) = query.role {
            select = select.filter(
                Column::Id.in_subquery(
                    Query::select()
                        .column(RoleColumn::UserId)
                        .from(UserRoles)
                        .and_where(RoleColumn::Role.eq(role.to_string()))
                        .to_owned(),
                ),
            );
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_err("查询用户总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_err("查询用户页数失败"))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询用户列表失败"))?;

        Ok(UserListResponse {
            items: Self::hydrate_users(&self.db, models).await?,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        let Some(existing) = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询用户失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password) = update.password {
            model.password_hash = Set(Some(password));
        }
        if let Some(display_name) = update.display_name {
            model.display_name = Set(display_name);
        }
        if let Some(avatar_url) = update.avatar_url {
            model.avatar_url = Set(Some(avatar_url));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        model.updated_at = Set(now_ts());

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_err("更新用户失败"))?;
        Self::hydrate_user(&self.db, Some(updated)).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除用户失败"))?;
        Ok(result.rows_affected > 0)
    }

    async fn count_users(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(db_err("统计用户数量失败"))
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::LastLogin, Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err("更新最后登录时间失败"))?;
        Ok(result.rows_affected > 0)
    }

    async fn replace_user_roles(&self, id: i64, roles: Vec<UserRole>) -> Result<Option<User>> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let Some(model) = Users::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err("查询用户失败"))?
        else {
            return Ok(None);
        };

        UserRoles::delete_many()
            .filter(RoleColumn::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err("清理用户角色失败"))?;
        Self::insert_roles(&txn, id, &roles).await?;

        Users::update_many()
            .col_expr(Column::UpdatedAt, Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err("更新用户失败"))?;

        let user = Self::hydrate_user(&txn, Some(model)).await?;
        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(user)
    }

    async fn link_user_teacher(
        &self,
        user_id: i64,
        teacher_id: Option<i64>,
    ) -> Result<Option<User>> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let Some(model) = Users::find_by_id(user_id)
            .one(&txn)
            .await
            .map_err(db_err("查询用户失败"))?
        else {
            return Ok(None);
        };

        TeacherUsers::delete_many()
            .filter(TeacherUserColumn::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(db_err("解除教师关联失败"))?;

        if let Some(teacher_id) = teacher_id {
            TeacherUserActiveModel {
                teacher_id: Set(teacher_id),
                user_id: Set(user_id),
                created_at: Set(now_ts()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_err("关联教师失败"))?;
        }

        let user = Self::hydrate_user(&txn, Some(model)).await?;
        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(user)
    }

    async fn list_active_user_ids_by_roles(&self, roles: &[UserRole]) -> Result<Vec<i64>> {
        let role_names: Vec<String> = roles.iter().map(|r| r.to_string()).collect();

        let ids: Vec<i64> = Users::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::Status.eq(UserStatus::Active.to_string()))
            .filter(
                Column::Id.in_subquery(
                    Query::select()
                        .column(RoleColumn::UserId)
                        .from(UserRoles)
                        .and_where(RoleColumn::Role.is_in(role_names))
                        .to_owned(),
                ),
            )
            .order_by_asc(Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err("查询角色用户失败"))?;

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::storage;
    use super::*;

    fn request(email: &str, roles: Vec<UserRole>) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            password: Some("hash".to_string()),
            display_name: "Someone".to_string(),
            avatar_url: None,
            roles,
        }
    }

    #[tokio::test]
    async fn test_create_user_with_roles() {
        let storage = storage().await;
        let user = storage
            .create_user(request(
                "desk@school.test",
                vec![UserRole::Staff, UserRole::Staff, UserRole::Teacher],
            ))
            .await
            .unwrap();

        assert_eq!(user.roles, vec![UserRole::Staff, UserRole::Teacher]);
        let found = storage
            .get_user_by_email("desk@school.test")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.password_hash.as_deref(), Some("hash"));
    }

    #[tokio::test]
    async fn test_replace_roles_and_filter() {
        let storage = storage().await;
        let a = storage
            .create_user(request("a@school.test", vec![UserRole::Teacher]))
            .await
            .unwrap();
        storage
            .create_user(request("b@school.test", vec![UserRole::Staff]))
            .await
            .unwrap();

        let updated = storage
            .replace_user_roles(a.id, vec![UserRole::Admin])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.roles, vec![UserRole::Admin]);

        let admins = storage
            .list_users_with_pagination(UserListQuery {
                page: None,
                size: None,
                role: Some(UserRole::Admin),
                status: None,
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(admins.pagination.total, 1);
        assert_eq!(admins.items[0].email, "a@school.test");

        let office = storage
            .list_active_user_ids_by_roles(&[UserRole::Admin, UserRole::Staff])
            .await
            .unwrap();
        assert_eq!(office.len(), 2);
    }

    #[tokio::test]
    async fn test_search_escapes_wildcards() {
        let storage = storage().await;
        storage
            .create_user(request("under_score@school.test", vec![]))
            .await
            .unwrap();
        storage
            .create_user(request("underXscore@school.test", vec![]))
            .await
            .unwrap();

        let result = storage
            .list_users_with_pagination(UserListQuery {
                page: Some(1),
                size: Some(10),
                role: None,
                status: None,
                search: Some("under_".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(result.items.len(), 1);
    }
}
