pub mod attendance;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod roster;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::attendance::requests::{AttendanceDateQuery, MarkAttendanceRequest};
use crate::models::batches::entities::Batch;
use crate::models::batches::requests::{BatchListParams, CreateBatchRequest, UpdateBatchRequest};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, forbidden, not_found};
use crate::storage::{BatchStorage, Storage};

super::define_service!(
    /// 班次、花名册与点名
    BatchService
);

/// 教务可以访问所有班次，教师只能访问自己任课的班次
pub(crate) fn can_access_batch(user: &User, batch: &Batch) -> bool {
    user.is_office() || user.teacher_id == Some(batch.teacher_id)
}

/// 加载班次并检查访问权限
pub(crate) async fn load_accessible_batch(
    storage: &dyn Storage,
    user: &User,
    batch_id: i64,
    action: &str,
) -> Result<Batch, HttpResponse> {
    let batch = match storage.get_batch_by_id(batch_id).await {
        Ok(Some(batch)) => batch,
        Ok(None) => return Err(not_found(ErrorCode::BatchNotFound, "Batch not found")),
        Err(e) => return Err(error_response(&e, action)),
    };
    if !can_access_batch(user, &batch) {
        return Err(forbidden(
            ErrorCode::BatchPermissionDenied,
            "You do not teach this batch",
        ));
    }
    Ok(batch)
}

pub(crate) fn capacity_invalid() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        "Capacity must be positive",
    ))
}

impl BatchService {
    pub async fn list_batches(
        &self,
        query: BatchListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_batches(self, query, request).await
    }

    pub async fn create_batch(
        &self,
        body: CreateBatchRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_batch(self, body, request).await
    }

    pub async fn get_batch(&self, batch_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_batch(self, batch_id, request).await
    }

    pub async fn update_batch(
        &self,
        batch_id: i64,
        body: UpdateBatchRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_batch(self, batch_id, body, request).await
    }

    pub async fn delete_batch(
        &self,
        batch_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_batch(self, batch_id, request).await
    }

    pub async fn get_roster(&self, batch_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        roster::get_roster(self, batch_id, request).await
    }

    pub async fn mark_attendance(
        &self,
        batch_id: i64,
        body: MarkAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attendance::mark_attendance(self, batch_id, body, request).await
    }

    pub async fn get_attendance(
        &self,
        batch_id: i64,
        query: AttendanceDateQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attendance::get_attendance(self, batch_id, query, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::batches::entities::BatchStatus;
    use crate::models::users::entities::{UserRole, UserStatus};
    use chrono::Utc;

    fn user(roles: Vec<UserRole>, teacher_id: Option<i64>) -> User {
        User {
            id: 9,
            email: "t@example.com".to_string(),
            password_hash: None,
            display_name: "T".to_string(),
            avatar_url: None,
            status: UserStatus::Active,
            roles,
            teacher_id,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn batch(teacher_id: i64) -> Batch {
        Batch {
            id: 1,
            name: "Piano A".to_string(),
            instrument_id: 1,
            teacher_id,
            recurrence: "MON 17:00-18:00".to_string(),
            capacity: 6,
            status: BatchStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_batch_access() {
        assert!(can_access_batch(&user(vec![UserRole::Staff], None), &batch(3)));
        assert!(can_access_batch(&user(vec![UserRole::Teacher], Some(3)), &batch(3)));
        assert!(!can_access_batch(&user(vec![UserRole::Teacher], Some(4)), &batch(3)));
        assert!(!can_access_batch(&user(vec![UserRole::Teacher], None), &batch(3)));
    }
}
