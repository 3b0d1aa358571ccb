pub mod convert;
pub mod create;
pub mod list;
pub mod notes;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ErrorCode;
use crate::models::prospects::requests::{
    CreateProspectNoteRequest, CreateProspectRequest, ProspectListParams,
};
use crate::models::students::entities::{Student, StudentStatus};
use crate::services::{error_response, not_found};
use crate::storage::{Storage, StudentStorage};

super::define_service!(
    /// 潜在学员：status 为 prospect 的学生
    ProspectService
);

/// 加载潜在学员，已转正或不存在时返回 404
pub(crate) async fn load_prospect(
    storage: &dyn Storage,
    student_id: i64,
    action: &str,
) -> Result<Student, HttpResponse> {
    match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) if student.status == StudentStatus::Prospect => Ok(student),
        Ok(_) => Err(not_found(ErrorCode::ProspectNotFound, "Prospect not found")),
        Err(e) => Err(error_response(&e, action)),
    }
}

impl ProspectService {
    pub async fn list_prospects(
        &self,
        query: ProspectListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_prospects(self, query, request).await
    }

    pub async fn create_prospect(
        &self,
        body: CreateProspectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_prospect(self, body, request).await
    }

    pub async fn list_notes(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        notes::list_notes(self, student_id, request).await
    }

    pub async fn create_note(
        &self,
        student_id: i64,
        body: CreateProspectNoteRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        notes::create_note(self, student_id, body, request).await
    }

    pub async fn convert_prospect(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        convert::convert_prospect(self, student_id, request).await
    }
}
