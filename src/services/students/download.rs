use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::path::Path;

use super::StudentService;
use crate::config::AppConfig;
use crate::errors::SchoolError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, not_found};
use crate::storage::StudentStorage;

pub async fn download_document(
    service: &StudentService,
    student_id: i64,
    document_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let document = match storage.get_document(student_id, document_id).await {
        Ok(Some(document)) => document,
        Ok(None) => return Ok(not_found(ErrorCode::DocumentNotFound, "Document not found")),
        Err(e) => return Ok(error_response(&e, "Failed to download document")),
    };

    let file_path = Path::new(&AppConfig::get().upload.dir).join(&document.stored_name);
    let data = match std::fs::read(&file_path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(not_found(ErrorCode::DocumentNotFound, "Document file is missing"));
        }
        Err(e) => {
            tracing::error!("{}", SchoolError::file_operation(format!("{e}")));
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "File read failed",
            )));
        }
    };

    // 文件名中的引号会破坏 Content-Disposition
    let file_name = document.file_name.replace('"', "");
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, document.mime_type))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ))
        .body(data))
}
