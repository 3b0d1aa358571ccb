pub mod batches;
pub mod create;
pub mod delete;
pub mod get;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::SchoolError;
use crate::models::batches::entities::{Batch, BatchStatus};
use crate::models::enrollments::requests::{
    CreateEnrollmentRequest, ReplaceBatchesRequest, UpdateEnrollmentRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, not_found};
use crate::storage::{BatchStorage, Storage};

super::define_service!(
    /// 报名与班次关联
    EnrollmentService
);

/// 去重后的班次 id，保持提交顺序
pub(crate) fn dedup_batch_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// 检查班次存在、未归档且乐器与报名一致
pub(crate) fn check_batches(
    requested: &[i64],
    found: &[Batch],
    instrument_id: i64,
) -> Result<(), (ErrorCode, String)> {
    for id in requested {
        let Some(batch) = found.iter().find(|b| b.id == *id) else {
            return Err((ErrorCode::BatchNotFound, format!("Batch {id} not found")));
        };
        if batch.status == BatchStatus::Archived {
            return Err((
                ErrorCode::EnrollmentInvalid,
                format!("Batch {id} is archived"),
            ));
        }
        if batch.instrument_id != instrument_id {
            return Err((
                ErrorCode::EnrollmentInvalid,
                format!("Batch {id} teaches a different instrument"),
            ));
        }
    }
    Ok(())
}

/// 加载并校验班次，失败时返回对应响应
pub(crate) async fn validate_batches(
    storage: &dyn Storage,
    batch_ids: &[i64],
    instrument_id: i64,
    action: &str,
) -> Result<(), HttpResponse> {
    if batch_ids.is_empty() {
        return Ok(());
    }
    let found = storage
        .get_batches_by_ids(batch_ids)
        .await
        .map_err(|e| error_response(&e, action))?;
    check_batches(batch_ids, &found, instrument_id).map_err(|(code, msg)| match code {
        ErrorCode::BatchNotFound => not_found(code, msg),
        _ => bad_request(code, msg),
    })
}

/// 满员冲突映射为 409
pub(crate) fn enrollment_error(e: &SchoolError, action: &str) -> HttpResponse {
    match e {
        SchoolError::Conflict(msg) => HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::BatchCapacityExceeded,
            msg.as_str(),
        )),
        _ => error_response(e, action),
    }
}

impl EnrollmentService {
    pub async fn create_enrollment(
        &self,
        body: CreateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_enrollment(self, body, request).await
    }

    pub async fn get_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_enrollment(self, enrollment_id, request).await
    }

    pub async fn update_enrollment(
        &self,
        enrollment_id: i64,
        body: UpdateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_enrollment(self, enrollment_id, body, request).await
    }

    pub async fn replace_batches(
        &self,
        enrollment_id: i64,
        body: ReplaceBatchesRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        batches::replace_batches(self, enrollment_id, body, request).await
    }

    pub async fn delete_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_enrollment(self, enrollment_id, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn batch(id: i64, instrument_id: i64, status: BatchStatus) -> Batch {
        Batch {
            id,
            name: format!("Batch {id}"),
            instrument_id,
            teacher_id: 1,
            recurrence: "SAT".to_string(),
            capacity: 4,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_dedup_batch_ids_keeps_order() {
        assert_eq!(dedup_batch_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn test_check_batches() {
        let found = [
            batch(1, 10, BatchStatus::Active),
            batch(2, 11, BatchStatus::Active),
            batch(3, 10, BatchStatus::Archived),
        ];
        assert!(check_batches(&[1], &found, 10).is_ok());
        assert_eq!(
            check_batches(&[4], &found, 10).unwrap_err().0,
            ErrorCode::BatchNotFound
        );
        assert_eq!(
            check_batches(&[2], &found, 10).unwrap_err().0,
            ErrorCode::EnrollmentInvalid
        );
        assert_eq!(
            check_batches(&[3], &found, 10).unwrap_err().0,
            ErrorCode::EnrollmentInvalid
        );
    }
}
