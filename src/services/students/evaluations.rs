use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StudentService, load_student};
use crate::config::AppConfig;
use crate::models::evaluations::entities::{MAX_SCORE, MIN_SCORE, NewEvaluation};
use crate::models::evaluations::requests::CreateEvaluationRequest;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, error_response, forbidden, not_found, unauthorized};
use crate::storage::{BatchStorage, EnrollmentStorage, EvaluationStorage, Storage, TeacherStorage};

pub async fn list_evaluations(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(response) =
        load_student(storage.as_ref(), student_id, "Failed to list evaluations").await
    {
        return Ok(response);
    }

    match storage.list_student_evaluations(student_id).await {
        Ok(evaluations) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            evaluations,
            "Evaluations retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to list evaluations")),
    }
}

/// 教师是否在教这名学生（学生任一报名关联的班次由其任课）
async fn teaches_student(
    storage: &dyn Storage,
    teacher_id: i64,
    student_id: i64,
) -> crate::errors::Result<bool> {
    let enrollments = storage.list_student_enrollments(student_id).await?;
    let batch_ids: Vec<i64> = enrollments
        .iter()
        .flat_map(|e| e.batch_ids.iter().copied())
        .collect();
    if batch_ids.is_empty() {
        return Ok(false);
    }
    let batches = storage.get_batches_by_ids(&batch_ids).await?;
    Ok(batches.iter().any(|b| b.teacher_id == teacher_id))
}

/// 确定评估人：管理员需指定 teacher_id，教师使用自己关联的档案
async fn resolve_evaluator(
    storage: &dyn Storage,
    user: &User,
    requested: Option<i64>,
    student_id: i64,
) -> Result<i64, HttpResponse> {
    const ACTION: &str = "Failed to create evaluation";

    if user.is_admin() {
        let Some(teacher_id) = requested.or(user.teacher_id) else {
            return Err(bad_request(
                ErrorCode::EvaluationInvalid,
                "teacher_id is required",
            ));
        };
        return match storage.get_teacher_by_id(teacher_id).await {
            Ok(Some(teacher)) => Ok(teacher.id),
            Ok(None) => Err(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
            Err(e) => Err(error_response(&e, ACTION)),
        };
    }

    let Some(teacher_id) = user.teacher_id else {
        return Err(forbidden(
            ErrorCode::Forbidden,
            "Only admins or the student's teachers can add evaluations",
        ));
    };
    match teaches_student(storage, teacher_id, student_id).await {
        Ok(true) => Ok(teacher_id),
        Ok(false) => Err(forbidden(
            ErrorCode::Forbidden,
            "You do not teach this student",
        )),
        Err(e) => Err(error_response(&e, ACTION)),
    }
}

pub async fn create_evaluation(
    service: &StudentService,
    student_id: i64,
    body: CreateEvaluationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = current_user(request) else {
        return Ok(unauthorized());
    };
    if !body.scores_valid() {
        return Ok(bad_request(
            ErrorCode::EvaluationInvalid,
            format!("Scores must be between {MIN_SCORE} and {MAX_SCORE}"),
        ));
    }

    let storage = service.get_storage(request);

    if let Err(response) =
        load_student(storage.as_ref(), student_id, "Failed to create evaluation").await
    {
        return Ok(response);
    }

    let teacher_id =
        match resolve_evaluator(storage.as_ref(), &user, body.teacher_id, student_id).await {
            Ok(id) => id,
            Err(response) => return Ok(response),
        };

    if let Some(enrollment_id) = body.enrollment_id {
        match storage.get_enrollment_by_id(enrollment_id).await {
            Ok(Some(e)) if e.student_id == student_id => {}
            Ok(_) => {
                return Ok(not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found"));
            }
            Err(e) => return Ok(error_response(&e, "Failed to create evaluation")),
        }
    }

    let evaluation = NewEvaluation {
        student_id,
        teacher_id,
        enrollment_id: body.enrollment_id,
        evaluated_on: body
            .evaluated_on
            .unwrap_or_else(|| AppConfig::get().school_today()),
        technique: body.technique,
        theory: body.theory,
        rhythm: body.rhythm,
        performance: body.performance,
        remarks: body.remarks.filter(|r| !r.trim().is_empty()),
    };

    match storage.create_evaluation(evaluation).await {
        Ok(evaluation) => {
            info!(
                "Teacher {} evaluated student {}",
                evaluation.teacher_id, evaluation.student_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                evaluation,
                "Evaluation created successfully",
            )))
        }
        Err(e) => Ok(error_response(&e, "Failed to create evaluation")),
    }
}
