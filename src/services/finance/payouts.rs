use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::FinanceService;
use crate::config::AppConfig;
use crate::errors::SchoolError;
use crate::models::finance::requests::MarkPayoutPaidRequest;
use crate::models::finance::responses::GeneratePayoutsResponse;
use crate::models::notifications::entities::NotificationKind;
use crate::models::teachers::requests::MonthQuery;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::notifications::{NotificationDraft, notify_roles};
use crate::services::projection::project_payout;
use crate::services::{bad_request, error_response, not_found, resolve_month};
use crate::storage::{FinanceStorage, TeacherStorage};

pub async fn list_payouts(
    service: &FinanceService,
    query: MonthQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some((month, _, _)) = resolve_month(query.month.as_deref()) else {
        return Ok(bad_request(ErrorCode::MonthInvalid, "month must be YYYY-MM"));
    };
    let storage = service.get_storage(request);

    match storage.list_payouts(None, Some(&month)).await {
        Ok(payouts) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            payouts,
            "Payouts retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to retrieve payouts")),
    }
}

/// 为每位在职教师生成当月结算（按实际课时），已有记录的教师跳过
pub async fn generate_payouts(
    service: &FinanceService,
    query: MonthQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    const ACTION: &str = "Failed to generate payouts";

    let Some((month, first, last)) = resolve_month(query.month.as_deref()) else {
        return Ok(bad_request(ErrorCode::MonthInvalid, "month must be YYYY-MM"));
    };
    let storage = service.get_storage(request);

    let teachers = match storage.list_active_teachers().await {
        Ok(teachers) => teachers,
        Err(e) => return Ok(error_response(&e, ACTION)),
    };

    let mut created = Vec::new();
    let mut skipped = 0;
    for teacher in &teachers {
        let projection = match project_payout(storage.as_ref(), teacher, &month, first, last).await
        {
            Ok(projection) => projection,
            Err(e) => return Ok(error_response(&e, ACTION)),
        };
        let sessions = i32::try_from(projection.delivered_sessions).unwrap_or(i32::MAX);

        match storage
            .create_payout_if_absent(teacher.id, &month, sessions, projection.earned_amount)
            .await
        {
            Ok(Some(payout)) => created.push(payout),
            Ok(None) => skipped += 1,
            Err(e) => return Ok(error_response(&e, ACTION)),
        }
    }
    info!(
        "Generated {} payouts for {} ({} skipped)",
        created.len(),
        month,
        skipped
    );

    if !created.is_empty() {
        let total: i64 = created.iter().map(|p| p.amount).sum();
        let draft = NotificationDraft::new(
            NotificationKind::PayoutsGenerated,
            format!("{} teacher payouts generated for {}", created.len(), month),
        )
        .body(format!("Total pending amount: {total}"))
        .link(format!("/finance/payouts?month={month}"));
        notify_roles(storage.as_ref(), &[UserRole::Admin], draft).await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GeneratePayoutsResponse {
            month,
            created,
            skipped,
        },
        "Payouts generated successfully",
    )))
}

pub async fn mark_payout_paid(
    service: &FinanceService,
    payout_id: i64,
    body: MarkPayoutPaidRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    const ACTION: &str = "Failed to mark payout as paid";
    let storage = service.get_storage(request);

    let paid_on = body
        .paid_on
        .unwrap_or_else(|| AppConfig::get().school_today());
    let notes = body.notes.filter(|n| !n.trim().is_empty());

    match storage.mark_payout_paid(payout_id, paid_on, notes).await {
        Ok(Some(payout)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            payout,
            "Payout marked as paid",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::PayoutNotFound, "Payout not found")),
        Err(SchoolError::Conflict(_)) => {
            warn!("Payout {} was already paid", payout_id);
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::PayoutAlreadyPaid,
                "Payout has already been paid",
            )))
        }
        Err(e) => Ok(error_response(&e, ACTION)),
    }
}
