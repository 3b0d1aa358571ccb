use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::StreamExt;
use futures_util::TryStreamExt;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use super::{StudentService, load_student};
use crate::config::AppConfig;
use crate::errors::SchoolError;
use crate::models::students::entities::NewStudentDocument;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, error_response, unauthorized};
use crate::storage::StudentStorage;
use crate::utils::file_magic::{detect_document_mime, file_extension};

const DEFAULT_DOC_TYPE: &str = "other";

fn upload_failed(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::FileUploadFailed,
        message,
    ))
}

/// 上传学生文档
///
/// 表单中只能有一个 `file` 字段；`doc_type` 可以作为表单字段或查询参数传入。
/// 扩展名必须在允许列表中，且文件头与扩展名一致。
pub async fn upload_document(
    service: &StudentService,
    student_id: i64,
    doc_type: Option<String>,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = current_user(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request);

    if let Err(response) = load_student(storage.as_ref(), student_id, "Failed to upload document").await
    {
        return Ok(response);
    }

    let config = AppConfig::get();
    let upload_dir = &config.upload.dir;
    let max_size = config.upload.max_size;

    let mut doc_type = doc_type;
    let mut upload: Option<(String, String, Vec<u8>)> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "file" => {
                if upload.is_some() {
                    return Ok(bad_request(
                        ErrorCode::MultifileUploadNotAllowed,
                        "Only one file can be uploaded at a time",
                    ));
                }

                let original_name = content_disposition
                    .and_then(|cd| cd.get_filename())
                    .map(|s| s.to_string())
                    .unwrap_or_default();

                let extension = file_extension(&original_name).unwrap_or_default();
                if !config
                    .upload
                    .allowed_types
                    .iter()
                    .any(|t| t.to_lowercase() == extension)
                {
                    return Ok(bad_request(ErrorCode::FileTypeNotAllowed, "File type not allowed"));
                }

                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk?;
                    if data.len() + chunk.len() > max_size {
                        return Ok(bad_request(
                            ErrorCode::FileSizeExceeded,
                            "File size exceeds the limit",
                        ));
                    }
                    data.extend_from_slice(&chunk);
                }

                upload = Some((original_name, extension, data));
            }
            "doc_type" => {
                let mut value = Vec::new();
                while let Some(chunk) = field.next().await {
                    value.extend_from_slice(&chunk?);
                }
                let value = String::from_utf8_lossy(&value).trim().to_string();
                if !value.is_empty() {
                    doc_type = Some(value);
                }
            }
            _ => {}
        }
    }

    let Some((original_name, extension, data)) = upload else {
        return Ok(bad_request(ErrorCode::BadRequest, "No file found in upload payload"));
    };

    let Some(mime_type) = detect_document_mime(&data, &extension) else {
        return Ok(bad_request(
            ErrorCode::FileTypeNotAllowed,
            "File content does not match its extension",
        ));
    };

    if !Path::new(upload_dir).exists()
        && let Err(e) = fs::create_dir_all(upload_dir)
    {
        tracing::error!("{}", SchoolError::file_operation(format!("{e}")));
        return Ok(upload_failed("Failed to create upload directory"));
    }

    let stored_name = format!("{}{}", Uuid::new_v4(), extension);
    let file_path = Path::new(upload_dir).join(&stored_name);
    if let Err(e) = fs::write(&file_path, &data) {
        tracing::error!("{}", SchoolError::file_operation(format!("{e}")));
        return Ok(upload_failed("Failed to write file"));
    }

    let document = NewStudentDocument {
        student_id,
        doc_type: doc_type
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_DOC_TYPE.to_string()),
        file_name: original_name,
        stored_name,
        file_size: data.len() as i64,
        mime_type: mime_type.to_string(),
        uploaded_by: user.id,
    };

    match storage.create_document(document).await {
        Ok(document) => Ok(HttpResponse::Created().json(ApiResponse::success(
            document,
            "Document uploaded successfully",
        ))),
        Err(e) => {
            // 记录写入失败时删除已落盘的文件
            let _ = fs::remove_file(&file_path);
            Ok(error_response(&e, "Failed to upload document"))
        }
    }
}
