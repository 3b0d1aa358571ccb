use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ProspectService, load_prospect};
use crate::models::students::entities::StudentStatus;
use crate::models::students::requests::UpdateStudentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, not_found};
use crate::storage::StudentStorage;

/// 潜在学员转为正式学生
pub async fn convert_prospect(
    service: &ProspectService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(response) = load_prospect(storage.as_ref(), student_id, "Failed to convert prospect").await
    {
        return Ok(response);
    }

    let update = UpdateStudentRequest {
        status: Some(StudentStatus::Active),
        ..Default::default()
    };
    match storage.update_student(student_id, update).await {
        Ok(Some(student)) => {
            info!("Prospect {} converted to active student", student.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                student,
                "Prospect converted successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::ProspectNotFound, "Prospect not found")),
        Err(e) => Ok(error_response(&e, "Failed to convert prospect")),
    }
}
