use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::path::Path;

use super::{StudentService, load_student};
use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, not_found};
use crate::storage::StudentStorage;

pub async fn list_documents(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(response) = load_student(storage.as_ref(), student_id, "Failed to list documents").await
    {
        return Ok(response);
    }

    match storage.list_documents(student_id).await {
        Ok(documents) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            documents,
            "Documents retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to list documents")),
    }
}

/// 删除记录后移除磁盘文件，文件已不存在时忽略
pub async fn delete_document(
    service: &StudentService,
    student_id: i64,
    document_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let document = match storage.get_document(student_id, document_id).await {
        Ok(Some(document)) => document,
        Ok(None) => return Ok(not_found(ErrorCode::DocumentNotFound, "Document not found")),
        Err(e) => return Ok(error_response(&e, "Failed to delete document")),
    };

    match storage.delete_document(student_id, document_id).await {
        Ok(true) => {}
        Ok(false) => return Ok(not_found(ErrorCode::DocumentNotFound, "Document not found")),
        Err(e) => return Ok(error_response(&e, "Failed to delete document")),
    }

    let file_path = Path::new(&AppConfig::get().upload.dir).join(&document.stored_name);
    if let Err(e) = std::fs::remove_file(&file_path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!("Failed to remove document file {}: {}", file_path.display(), e);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Document deleted successfully")))
}
