//! 教师档案存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, db_err, normalize_page, now_ts};
use crate::entity::teacher_users::{Column as TeacherUserColumn, Entity as TeacherUsers};
use crate::entity::teachers::{ActiveModel, Column, Entity as Teachers, Model};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    teachers::{
        entities::{Teacher, TeacherStatus},
        requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
        responses::TeacherListResponse,
    },
};
use crate::storage::TeacherStorage;
use crate::utils::like_contains;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 附加教师关联的登录账号
    async fn attach_teacher_users(&self, models: Vec<Model>) -> Result<Vec<Teacher>> {
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let links: HashMap<i64, i64> = if ids.is_empty() {
            HashMap::new()
        } else {
            TeacherUsers::find()
                .filter(TeacherUserColumn::TeacherId.is_in(ids))
                .all(&self.db)
                .await
                .map_err(db_err("查询教师关联失败"))?
                .into_iter()
                .map(|row| (row.teacher_id, row.user_id))
                .collect()
        };

        Ok(models
            .into_iter()
            .map(|m| {
                let user_id = links.get(&m.id).copied();
                m.into_teacher(user_id)
            })
            .collect())
    }

    async fn attach_teacher_user(&self, model: Option<Model>) -> Result<Option<Teacher>> {
        match model {
            Some(m) => Ok(self.attach_teacher_users(vec![m]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TeacherStorage for SeaOrmStorage {
    async fn create_teacher(&self, req: CreateTeacherRequest) -> Result<Teacher> {
        let now = now_ts();
        let model = ActiveModel {
            name: Set(req.name),
            email: Set(req.email),
            phone: Set(req.phone),
            payout_type: Set(req.payout_type.to_string()),
            rate: Set(req.rate),
            status: Set(TeacherStatus::Active.to_string()),
            joined_on: Set(req.joined_on),
            notes: Set(req.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("创建教师失败"))?;

        Ok(model.into_teacher(None))
    }

    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>> {
        let model = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询教师失败"))?;
        self.attach_teacher_user(model).await
    }

    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Teachers::find();
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(like_contains(search.trim())))
                    .add(Column::Email.like(like_contains(search.trim()))),
            );
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_err("查询教师总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_err("查询教师页数失败"))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询教师列表失败"))?;

        Ok(TeacherListResponse {
            items: self.attach_teacher_users(models).await?,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    async fn list_active_teachers(&self) -> Result<Vec<Teacher>> {
        let models = Teachers::find()
            .filter(Column::Status.eq(TeacherStatus::Active.to_string()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询在职教师失败"))?;
        self.attach_teacher_users(models).await
    }

    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        let Some(existing) = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询教师失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(payout_type) = update.payout_type {
            model.payout_type = Set(payout_type.to_string());
        }
        if let Some(rate) = update.rate {
            model.rate = Set(rate);
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(joined_on) = update.joined_on {
            model.joined_on = Set(Some(joined_on));
        }
        if let Some(notes) = update.notes {
            model.notes = Set(Some(notes));
        }
        model.updated_at = Set(now_ts());

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_err("更新教师失败"))?;
        self.attach_teacher_user(Some(updated)).await
    }

    async fn delete_teacher(&self, id: i64) -> Result<bool> {
        let result = Teachers::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除教师失败"))?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_batch, storage};
    use super::*;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::UserStorage;

    #[tokio::test]
    async fn test_teacher_link_is_visible_from_both_sides() {
        let storage = storage().await;
        let (teacher_id, _, _) = seed_batch(&storage, 5).await;
        let user = storage
            .create_user(CreateUserRequest {
                email: "ravi@school.test".to_string(),
                password: None,
                display_name: "Ravi".to_string(),
                avatar_url: None,
                roles: vec![],
            })
            .await
            .unwrap();

        let linked = storage
            .link_user_teacher(user.id, Some(teacher_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(linked.teacher_id, Some(teacher_id));

        let teacher = storage.get_teacher_by_id(teacher_id).await.unwrap().unwrap();
        assert_eq!(teacher.user_id, Some(user.id));

        let unlinked = storage
            .link_user_teacher(user.id, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unlinked.teacher_id, None);
    }

    #[tokio::test]
    async fn test_update_and_list_active() {
        let storage = storage().await;
        let (teacher_id, _, _) = seed_batch(&storage, 5).await;

        let updated = storage
            .update_teacher(
                teacher_id,
                UpdateTeacherRequest {
                    name: None,
                    email: None,
                    phone: None,
                    payout_type: None,
                    rate: Some(750),
                    status: Some(TeacherStatus::Inactive),
                    joined_on: None,
                    notes: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.rate, 750);
        assert!(storage.list_active_teachers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_teachers_search_by_name() {
        let storage = storage().await;
        seed_batch(&storage, 5).await;

        let search = |term: &str| TeacherListQuery {
            page: None,
            size: None,
            status: None,
            search: Some(term.to_string()),
        };
        let found = storage
            .list_teachers_with_pagination(search("rav"))
            .await
            .unwrap();
        assert_eq!(found.pagination.total, 1);
        assert_eq!(found.items[0].name, "Ravi");

        let none = storage
            .list_teachers_with_pagination(search("%"))
            .await
            .unwrap();
        assert_eq!(none.pagination.total, 0);
    }
}
