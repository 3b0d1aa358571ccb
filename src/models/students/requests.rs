use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::StudentStatus;
use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<StudentStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<StudentStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct CreateStudentRequest {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<StudentStatus>,
    pub source: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct UpdateStudentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<StudentStatus>,
    pub source: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct CreateGuardianRequest {
    pub name: String,
    pub relation: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

// 文档上传时可通过查询参数指定类型
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct DocumentUploadQuery {
    pub doc_type: Option<String>,
}
