use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::EnrollmentStatus;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct CreateEnrollmentRequest {
    pub student_id: i64,
    pub instrument_id: i64,
    pub package_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub batch_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct UpdateEnrollmentRequest {
    pub status: Option<EnrollmentStatus>,
    pub package_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct ReplaceBatchesRequest {
    pub batch_ids: Vec<i64>,
}

/// 新建报名（存储层入参，日期已确定）
#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub student_id: i64,
    pub instrument_id: i64,
    pub package_id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub batch_ids: Vec<i64>,
}
