pub mod create;
pub mod credits;
pub mod delete;
pub mod documents;
pub mod download;
pub mod evaluations;
pub mod get;
pub mod guardians;
pub mod list;
pub mod update;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ErrorCode;
use crate::models::evaluations::requests::CreateEvaluationRequest;
use crate::models::students::entities::Student;
use crate::models::students::requests::{
    CreateGuardianRequest, CreateStudentRequest, StudentListParams, UpdateStudentRequest,
};
use crate::services::{error_response, not_found};
use crate::storage::{Storage, StudentStorage};
use crate::utils::validate::{normalize_email, validate_email, validate_name, validate_phone};

super::define_service!(
    /// 学生档案、监护人、文档与评估
    StudentService
);

/// 校验学生资料中出现的字段，邮箱统一转小写
pub(crate) fn validate_student_fields(
    first_name: Option<&str>,
    email: &mut Option<String>,
    phone: Option<&str>,
    metadata: Option<&serde_json::Value>,
) -> Result<(), &'static str> {
    if let Some(name) = first_name {
        validate_name(name)?;
    }
    if let Some(value) = email.take() {
        let value = normalize_email(&value);
        if !value.is_empty() {
            validate_email(&value)?;
            *email = Some(value);
        }
    }
    if let Some(phone) = phone.filter(|p| !p.trim().is_empty()) {
        validate_phone(phone)?;
    }
    // metadata 只接受 JSON 对象，null 用于清空
    if let Some(meta) = metadata
        && !(meta.is_object() || meta.is_null())
    {
        return Err("metadata must be a JSON object");
    }
    Ok(())
}

pub(crate) async fn load_student(
    storage: &dyn Storage,
    student_id: i64,
    action: &str,
) -> Result<Student, HttpResponse> {
    match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => Ok(student),
        Ok(None) => Err(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Err(error_response(&e, action)),
    }
}

impl StudentService {
    pub async fn list_students(
        &self,
        query: StudentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, query, request).await
    }

    pub async fn create_student(
        &self,
        body: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, body, request).await
    }

    pub async fn get_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_student(self, student_id, request).await
    }

    pub async fn update_student(
        &self,
        student_id: i64,
        body: UpdateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, student_id, body, request).await
    }

    pub async fn delete_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_student(self, student_id, request).await
    }

    pub async fn get_credits(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        credits::get_credits(self, student_id, request).await
    }

    // 监护人
    pub async fn list_guardians(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        guardians::list_guardians(self, student_id, request).await
    }

    pub async fn create_guardian(
        &self,
        student_id: i64,
        body: CreateGuardianRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        guardians::create_guardian(self, student_id, body, request).await
    }

    pub async fn delete_guardian(
        &self,
        student_id: i64,
        guardian_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        guardians::delete_guardian(self, student_id, guardian_id, request).await
    }

    // 文档
    pub async fn list_documents(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        documents::list_documents(self, student_id, request).await
    }

    pub async fn upload_document(
        &self,
        student_id: i64,
        doc_type: Option<String>,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        upload::upload_document(self, student_id, doc_type, payload, request).await
    }

    pub async fn download_document(
        &self,
        student_id: i64,
        document_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        download::download_document(self, student_id, document_id, request).await
    }

    pub async fn delete_document(
        &self,
        student_id: i64,
        document_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        documents::delete_document(self, student_id, document_id, request).await
    }

    // 评估
    pub async fn list_evaluations(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        evaluations::list_evaluations(self, student_id, request).await
    }

    pub async fn create_evaluation(
        &self,
        student_id: i64,
        body: CreateEvaluationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        evaluations::create_evaluation(self, student_id, body, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_student_fields() {
        let mut email = Some(" Asha@Example.COM ".to_string());
        assert!(validate_student_fields(Some("Asha"), &mut email, None, None).is_ok());
        assert_eq!(email.as_deref(), Some("asha@example.com"));

        let mut empty = Some("  ".to_string());
        assert!(validate_student_fields(None, &mut empty, None, None).is_ok());
        assert_eq!(empty, None);

        let mut none = None;
        assert!(validate_student_fields(Some(""), &mut none, None, None).is_err());
        assert!(validate_student_fields(None, &mut none, Some("abc"), None).is_err());
        assert!(validate_student_fields(None, &mut none, None, Some(&json!([1]))).is_err());
        assert!(
            validate_student_fields(None, &mut none, None, Some(&json!({"credit_adjustment": 2})))
                .is_ok()
        );
    }
}
