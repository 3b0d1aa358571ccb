pub mod count;
pub mod delete;
pub mod dispatch;
pub mod list;
pub mod read;
pub mod stream;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

pub use dispatch::{NotificationDraft, notify_office, notify_roles, notify_users};
pub use stream::ConnectionManager;

use crate::models::notifications::requests::NotificationListParams;

super::define_service!(
    /// 站内通知
    NotificationService
);

impl NotificationService {
    // 当前用户的通知列表
    pub async fn list_notifications(
        &self,
        query: NotificationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_notifications(self, query, request).await
    }

    // 未读数量
    pub async fn get_unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        count::get_unread_count(self, request).await
    }

    // 标记单条已读
    pub async fn mark_as_read(
        &self,
        notification_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        read::mark_as_read(self, notification_id, request).await
    }

    // 全部标记已读
    pub async fn mark_all_as_read(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        read::mark_all_as_read(self, request).await
    }

    // 删除通知
    pub async fn delete_notification(
        &self,
        notification_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_notification(self, notification_id, request).await
    }

    // SSE 推送
    pub async fn stream(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stream::open_stream(request).await
    }
}
