use serde::Deserialize;
use ts_rs::TS;

use super::entities::BatchStatus;
use crate::models::common::{PaginationQuery, query::optional_i64};

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "batch.ts")]
pub struct BatchListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "optional_i64")]
    pub teacher_id: Option<i64>,
    #[serde(default, deserialize_with = "optional_i64")]
    pub instrument_id: Option<i64>,
    pub status: Option<BatchStatus>,
}

#[derive(Debug, Clone)]
pub struct BatchListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub teacher_id: Option<i64>,
    pub instrument_id: Option<i64>,
    pub status: Option<BatchStatus>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "batch.ts")]
pub struct CreateBatchRequest {
    pub name: String,
    pub instrument_id: i64,
    pub teacher_id: i64,
    pub recurrence: String,
    pub capacity: i32,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "batch.ts")]
pub struct UpdateBatchRequest {
    pub name: Option<String>,
    pub instrument_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub recurrence: Option<String>,
    pub capacity: Option<i32>,
    pub status: Option<BatchStatus>,
}
