//! 通知分发：写入数据库后推送给在线连接
//!
//! 通知是业务操作的副作用，失败只记录日志，不影响主流程。

use tracing::{debug, warn};

use super::ConnectionManager;
use crate::models::notifications::entities::{NewNotification, NotificationKind};
use crate::models::users::entities::UserRole;
use crate::storage::{NotificationStorage, Storage, UserStorage};

/// 待发送的通知内容
#[derive(Debug, Clone)]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: String,
    pub body: Option<String>,
    pub link: Option<String>,
}

impl NotificationDraft {
    pub fn new(kind: NotificationKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            body: None,
            link: None,
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// 发给指定用户，返回写入的条数
pub async fn notify_users(storage: &dyn Storage, user_ids: &[i64], draft: NotificationDraft) -> usize {
    if user_ids.is_empty() {
        return 0;
    }

    let items = user_ids
        .iter()
        .map(|&user_id| NewNotification {
            user_id,
            kind: draft.kind,
            title: draft.title.clone(),
            body: draft.body.clone(),
            link: draft.link.clone(),
        })
        .collect();

    let created = match storage.create_notifications(items).await {
        Ok(created) => created,
        Err(e) => {
            warn!("Failed to create {} notifications: {}", draft.kind, e);
            return 0;
        }
    };

    let manager = ConnectionManager::get();
    let count = created.len();
    let pushed = created
        .into_iter()
        .filter(|n| manager.is_online(n.user_id) && manager.push(n.clone()))
        .count();
    debug!("{} notifications created, {} pushed live", count, pushed);
    count
}

/// 发给拥有任一角色的活跃用户
pub async fn notify_roles(storage: &dyn Storage, roles: &[UserRole], draft: NotificationDraft) -> usize {
    match storage.list_active_user_ids_by_roles(roles).await {
        Ok(user_ids) => notify_users(storage, &user_ids, draft).await,
        Err(e) => {
            warn!("Failed to resolve notification recipients: {}", e);
            0
        }
    }
}

/// 发给管理员与教务
pub async fn notify_office(storage: &dyn Storage, draft: NotificationDraft) -> usize {
    notify_roles(storage, &[UserRole::Admin, UserRole::Staff], draft).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn seed_user(storage: &SeaOrmStorage, email: &str, roles: Vec<UserRole>) -> i64 {
        storage
            .create_user(CreateUserRequest {
                email: email.to_string(),
                password: None,
                display_name: email.to_string(),
                avatar_url: None,
                roles,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_office_notifications_skip_teachers() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let admin = seed_user(&storage, "admin@school.test", vec![UserRole::Admin]).await;
        let staff = seed_user(&storage, "desk@school.test", vec![UserRole::Staff]).await;
        let teacher = seed_user(&storage, "ravi@school.test", vec![UserRole::Teacher]).await;

        let draft = NotificationDraft::new(NotificationKind::LowCredits, "Low credits")
            .body("Asha has 1 class left")
            .link("/students/1");
        assert_eq!(notify_office(&storage, draft).await, 2);

        assert_eq!(storage.count_unread_notifications(admin).await.unwrap(), 1);
        assert_eq!(storage.count_unread_notifications(staff).await.unwrap(), 1);
        assert_eq!(storage.count_unread_notifications(teacher).await.unwrap(), 0);
    }
}
