use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ProspectService, load_prospect};
use crate::models::prospects::requests::CreateProspectNoteRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, error_response, unauthorized};
use crate::storage::ProspectStorage;

pub async fn list_notes(
    service: &ProspectService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 转正后的跟进记录仍可查看
    match storage.list_prospect_notes(student_id).await {
        Ok(notes) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            notes,
            "Notes retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to retrieve notes")),
    }
}

pub async fn create_note(
    service: &ProspectService,
    student_id: i64,
    mut body: CreateProspectNoteRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = current_user(request) else {
        return Ok(unauthorized());
    };
    body.note = body.note.trim().to_string();
    if body.note.is_empty() {
        return Ok(bad_request(ErrorCode::BadRequest, "Note must not be empty"));
    }

    let storage = service.get_storage(request);

    if let Err(response) = load_prospect(storage.as_ref(), student_id, "Failed to add note").await {
        return Ok(response);
    }

    match storage.create_prospect_note(student_id, user.id, body).await {
        Ok(note) => Ok(HttpResponse::Created().json(ApiResponse::success(
            note,
            "Note added successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to add note")),
    }
}
