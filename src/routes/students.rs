use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::evaluations::requests::CreateEvaluationRequest;
use crate::models::students::requests::{
    CreateGuardianRequest, CreateStudentRequest, DocumentUploadQuery, StudentListParams,
    UpdateStudentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::StudentService;
use crate::utils::{SafeDocumentIdI64, SafeGuardianIdI64, SafeIDI64};

// 懒加载的全局 StudentService 实例
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(query.into_inner(), &req).await
}

pub async fn create_student(
    req: HttpRequest,
    body: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.create_student(body.into_inner(), &req).await
}

pub async fn get_student(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(student_id.0, &req).await
}

pub async fn update_student(
    req: HttpRequest,
    student_id: SafeIDI64,
    body: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(student_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_student(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(student_id.0, &req).await
}

pub async fn get_credits(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_credits(student_id.0, &req).await
}

pub async fn list_guardians(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_guardians(student_id.0, &req).await
}

pub async fn create_guardian(
    req: HttpRequest,
    student_id: SafeIDI64,
    body: web::Json<CreateGuardianRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .create_guardian(student_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_guardian(
    req: HttpRequest,
    student_id: SafeIDI64,
    guardian_id: SafeGuardianIdI64,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .delete_guardian(student_id.0, guardian_id.0, &req)
        .await
}

pub async fn list_documents(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_documents(student_id.0, &req).await
}

pub async fn upload_document(
    req: HttpRequest,
    student_id: SafeIDI64,
    query: web::Query<DocumentUploadQuery>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .upload_document(student_id.0, query.into_inner().doc_type, payload, &req)
        .await
}

pub async fn download_document(
    req: HttpRequest,
    student_id: SafeIDI64,
    document_id: SafeDocumentIdI64,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .download_document(student_id.0, document_id.0, &req)
        .await
}

pub async fn delete_document(
    req: HttpRequest,
    student_id: SafeIDI64,
    document_id: SafeDocumentIdI64,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .delete_document(student_id.0, document_id.0, &req)
        .await
}

pub async fn list_evaluations(
    req: HttpRequest,
    student_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_evaluations(student_id.0, &req).await
}

pub async fn create_evaluation(
    req: HttpRequest,
    student_id: SafeIDI64,
    body: web::Json<CreateEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .create_evaluation(student_id.0, body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/students")
            .wrap(middlewares::RequireJWT)
            // 评估：教师可查看，录入权限在业务层校验
            .service(
                web::resource("/{id}/evaluations")
                    .wrap(middlewares::RequireRole::new_any(UserRole::all_roles()))
                    .route(web::get().to(list_evaluations))
                    .route(web::post().to(create_evaluation)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("", web::get().to(list_students))
                    .route("", web::post().to(create_student))
                    .route("/{id}", web::get().to(get_student))
                    .route("/{id}", web::put().to(update_student))
                    .route("/{id}", web::delete().to(delete_student))
                    .route("/{id}/credits", web::get().to(get_credits))
                    .route("/{id}/guardians", web::get().to(list_guardians))
                    .route("/{id}/guardians", web::post().to(create_guardian))
                    .route(
                        "/{id}/guardians/{guardian_id}",
                        web::delete().to(delete_guardian),
                    )
                    .route("/{id}/documents", web::get().to(list_documents))
                    .service(
                        web::resource("/{id}/documents")
                            .wrap(RateLimit::document_upload())
                            .route(web::post().to(upload_document)),
                    )
                    .route(
                        "/{id}/documents/{document_id}",
                        web::get().to(download_document),
                    )
                    .route(
                        "/{id}/documents/{document_id}",
                        web::delete().to(delete_document),
                    ),
            ),
    );
}
