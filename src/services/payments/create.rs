use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{PaymentService, resolve_credits};
use crate::config::AppConfig;
use crate::models::notifications::entities::NotificationKind;
use crate::models::payments::entities::NewPayment;
use crate::models::payments::requests::CreatePaymentRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::mail::{format_amount, spawn_payment_receipt};
use crate::services::notifications::{NotificationDraft, notify_roles};
use crate::services::{bad_request, current_user, error_response, not_found, unauthorized};
use crate::storage::{EnrollmentStorage, PackageStorage, PaymentStorage, StudentStorage};

/// 登记收款
///
/// 报名必须属于该学生；未指定课程包时沿用报名上的课程包。
/// 成功后通知所有管理员，学生有邮箱且配置了 SMTP 时异步发送收据。
pub async fn create_payment(
    service: &PaymentService,
    body: CreatePaymentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    const ACTION: &str = "Payment creation failed";

    let Some(user) = current_user(request) else {
        return Ok(unauthorized());
    };
    if body.amount <= 0 {
        return Ok(bad_request(ErrorCode::PaymentInvalid, "amount must be positive"));
    }
    if body.credits.is_some_and(|c| c < 0) {
        return Ok(bad_request(ErrorCode::PaymentInvalid, "credits must not be negative"));
    }

    let storage = service.get_storage(request);

    let student = match storage.get_student_by_id(body.student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(error_response(&e, ACTION)),
    };

    let mut package_id = body.package_id;
    if let Some(enrollment_id) = body.enrollment_id {
        match storage.get_enrollment_by_id(enrollment_id).await {
            Ok(Some(enrollment)) if enrollment.student_id == student.id => {
                package_id = package_id.or(enrollment.package_id);
            }
            Ok(Some(_)) => {
                return Ok(bad_request(
                    ErrorCode::PaymentInvalid,
                    "Enrollment does not belong to this student",
                ));
            }
            Ok(None) => {
                return Ok(not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found"));
            }
            Err(e) => return Ok(error_response(&e, ACTION)),
        }
    }

    let package = match package_id {
        Some(id) => match storage.get_package_by_id(id).await {
            Ok(Some(package)) => Some(package),
            Ok(None) => return Ok(not_found(ErrorCode::PackageNotFound, "Package not found")),
            Err(e) => return Ok(error_response(&e, ACTION)),
        },
        None => None,
    };

    let payment = NewPayment {
        student_id: student.id,
        enrollment_id: body.enrollment_id,
        package_id,
        amount: body.amount,
        credits: resolve_credits(body.credits, package.as_ref()),
        method: body.method,
        paid_on: body
            .paid_on
            .unwrap_or_else(|| AppConfig::get().school_today()),
        reference: body.reference.filter(|r| !r.trim().is_empty()),
        notes: body.notes.filter(|n| !n.trim().is_empty()),
        recorded_by: user.id,
    };

    let payment = match storage.create_payment(payment).await {
        Ok(payment) => payment,
        Err(e) => return Ok(error_response(&e, ACTION)),
    };
    info!(
        "Payment {} recorded for student {}: {} ({} credits)",
        payment.id, payment.student_id, payment.amount, payment.credits
    );

    let amount = format_amount(payment.amount, &AppConfig::get().school.currency);
    let draft = NotificationDraft::new(
        NotificationKind::PaymentReceived,
        format!("Payment received from {}", student.full_name()),
    )
    .body(format!("{} via {}, {} credits", amount, payment.method, payment.credits))
    .link(format!("/payments/{}", payment.id));
    notify_roles(storage.as_ref(), &[UserRole::Admin], draft).await;

    if let Some(email) = student.email.clone() {
        spawn_payment_receipt(email, student.full_name(), payment.clone());
    }

    Ok(HttpResponse::Created().json(ApiResponse::success(
        payment,
        "Payment recorded successfully",
    )))
}
