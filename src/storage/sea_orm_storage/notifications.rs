//! 通知存储操作

use super::{SeaOrmStorage, db_err, normalize_page, now_ts};
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    notifications::{
        entities::{NewNotification, Notification},
        responses::NotificationListResponse,
    },
};
use crate::storage::NotificationStorage;
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

#[async_trait]
impl NotificationStorage for SeaOrmStorage {
    async fn create_notifications(&self, items: Vec<NewNotification>) -> Result<Vec<Notification>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let now = now_ts();
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;
        let mut created = Vec::with_capacity(items.len());

        for item in items {
            let model = ActiveModel {
                user_id: Set(item.user_id),
                kind: Set(item.kind.to_string()),
                title: Set(item.title),
                body: Set(item.body),
                link: Set(item.link),
                is_read: Set(false),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_err("批量创建通知失败"))?;
            created.push(model.into_notification());
        }

        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(created)
    }

    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        unread_only: bool,
        page: i64,
        size: i64,
    ) -> Result<NotificationListResponse> {
        let (page, size) = normalize_page(Some(page), Some(size));

        let mut select = Notifications::find().filter(Column::UserId.eq(user_id));
        if unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_err("查询通知总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_err("查询通知页数失败"))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询通知列表失败"))?;

        Ok(NotificationListResponse {
            items: models.into_iter().map(|m| m.into_notification()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    async fn count_unread_notifications(&self, user_id: i64) -> Result<i64> {
        let count = Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(db_err("统计未读通知失败"))?;
        Ok(count as i64)
    }

    async fn mark_notification_read(&self, user_id: i64, id: i64) -> Result<bool> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .filter(Column::Id.eq(id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(db_err("标记通知已读失败"))?;
        Ok(result.rows_affected > 0)
    }

    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_err("标记全部已读失败"))?;
        Ok(result.rows_affected)
    }

    async fn delete_notification(&self, user_id: i64, id: i64) -> Result<bool> {
        let result = Notifications::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(db_err("删除通知失败"))?;
        Ok(result.rows_affected > 0)
    }

    async fn cleanup_read_notifications(&self, before: i64) -> Result<u64> {
        let result = Notifications::delete_many()
            .filter(Column::IsRead.eq(true))
            .filter(Column::CreatedAt.lt(before))
            .exec(&self.db)
            .await
            .map_err(db_err("清理通知失败"))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::storage;
    use super::*;
    use crate::models::notifications::entities::NotificationKind;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::UserStorage;

    #[tokio::test]
    async fn test_notifications_are_scoped_to_owner() {
        let storage = storage().await;
        let mut ids = Vec::new();
        for email in ["a@school.test", "b@school.test"] {
            let user = storage
                .create_user(CreateUserRequest {
                    email: email.to_string(),
                    password: None,
                    display_name: email.to_string(),
                    avatar_url: None,
                    roles: vec![],
                })
                .await
                .unwrap();
            ids.push(user.id);
        }

        let created = storage
            .create_notifications(
                ids.iter()
                    .map(|&user_id| NewNotification {
                        user_id,
                        kind: NotificationKind::General,
                        title: "Hello".to_string(),
                        body: None,
                        link: None,
                    })
                    .collect(),
            )
            .await
            .unwrap();
        assert_eq!(created.len(), 2);

        // 其他用户的通知不能被标记或删除
        assert!(!storage.mark_notification_read(ids[0], created[1].id).await.unwrap());
        assert!(!storage.delete_notification(ids[0], created[1].id).await.unwrap());

        assert!(storage.mark_notification_read(ids[0], created[0].id).await.unwrap());
        assert_eq!(storage.count_unread_notifications(ids[0]).await.unwrap(), 0);
        assert_eq!(storage.count_unread_notifications(ids[1]).await.unwrap(), 1);

        let unread = storage
            .list_notifications_with_pagination(ids[1], true, 1, 10)
            .await
            .unwrap();
        assert_eq!(unread.items.len(), 1);
        assert_eq!(storage.mark_all_notifications_read(ids[1]).await.unwrap(), 1);
    }
}
