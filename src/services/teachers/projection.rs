use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TeacherService, can_view_teacher};
use crate::models::teachers::requests::MonthQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::projection::project_payout;
use crate::services::{
    bad_request, current_user, error_response, forbidden, not_found, resolve_month, unauthorized,
};
use crate::storage::TeacherStorage;

pub async fn get_projection(
    service: &TeacherService,
    teacher_id: i64,
    query: MonthQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = current_user(request) else {
        return Ok(unauthorized());
    };
    if !can_view_teacher(&user, teacher_id) {
        return Ok(forbidden(
            ErrorCode::Forbidden,
            "You can only view your own payouts",
        ));
    }

    let Some((month, first, last)) = resolve_month(query.month.as_deref()) else {
        return Ok(bad_request(
            ErrorCode::MonthInvalid,
            "Month must be in YYYY-MM format",
        ));
    };

    let storage = service.get_storage(request);
    let teacher = match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(teacher)) => teacher,
        Ok(None) => return Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => return Ok(error_response(&e, "Failed to project payout")),
    };

    match project_payout(storage.as_ref(), &teacher, &month, first, last).await {
        Ok(projection) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            projection,
            "Payout projection calculated successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to project payout")),
    }
}
