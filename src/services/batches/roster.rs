use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{BatchService, load_accessible_batch};
use crate::models::ApiResponse;
use crate::models::batches::responses::{BatchRosterResponse, RosterEntry};
use crate::services::credits::enrollment_credits;
use crate::services::{current_user, error_response, unauthorized};
use crate::storage::BatchStorage;

pub async fn get_roster(
    service: &BatchService,
    batch_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = current_user(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request);

    let batch =
        match load_accessible_batch(storage.as_ref(), &user, batch_id, "Failed to get roster").await
        {
            Ok(batch) => batch,
            Err(response) => return Ok(response),
        };

    let roster = match storage.list_batch_roster(batch.id).await {
        Ok(roster) => roster,
        Err(e) => return Ok(error_response(&e, "Failed to get roster")),
    };

    let mut students = Vec::with_capacity(roster.len());
    for (enrollment, student) in roster {
        let credits = match enrollment_credits(storage.as_ref(), &enrollment).await {
            Ok(credits) => credits,
            Err(e) => return Ok(error_response(&e, "Failed to get roster")),
        };
        students.push(RosterEntry {
            enrollment_id: enrollment.id,
            student_id: student.id,
            first_name: student.first_name,
            last_name: student.last_name,
            enrollment_status: enrollment.status,
            remaining_credits: credits.remaining,
        });
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        BatchRosterResponse { batch, students },
        "Roster retrieved successfully",
    )))
}
