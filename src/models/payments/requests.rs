use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::PaymentMethod;
use crate::models::common::{PaginationQuery, query::optional_i64};

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct PaymentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "optional_i64")]
    pub student_id: Option<i64>,
    pub method: Option<PaymentMethod>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct PaymentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub method: Option<PaymentMethod>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

// 收款登记，credits 缺省取课程包的课时数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct CreatePaymentRequest {
    pub student_id: i64,
    pub enrollment_id: Option<i64>,
    pub package_id: Option<i64>,
    pub amount: i64,
    pub credits: Option<i32>,
    pub method: PaymentMethod,
    pub paid_on: Option<NaiveDate>,
    pub reference: Option<String>,
    pub notes: Option<String>,
}
