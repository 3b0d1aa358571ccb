use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::{PayoutType, TeacherAttendanceStatus, TeacherStatus};
use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct TeacherListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<TeacherStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TeacherListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<TeacherStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct CreateTeacherRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub payout_type: PayoutType,
    pub rate: i64,
    pub joined_on: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct UpdateTeacherRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub payout_type: Option<PayoutType>,
    pub rate: Option<i64>,
    pub status: Option<TeacherStatus>,
    pub joined_on: Option<NaiveDate>,
    pub notes: Option<String>,
}

// 管理员/教务补登教师出勤
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct MarkTeacherAttendanceRequest {
    pub batch_id: i64,
    pub date: NaiveDate,
    pub status: TeacherAttendanceStatus,
}

// 月份查询，缺省为学校时区下的当月
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct MonthQuery {
    pub month: Option<String>,
}
