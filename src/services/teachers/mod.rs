pub mod attendance;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod overview;
pub mod projection;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::teachers::requests::{
    CreateTeacherRequest, MarkTeacherAttendanceRequest, MonthQuery, TeacherListParams,
    UpdateTeacherRequest,
};
use crate::models::users::entities::User;

super::define_service!(
    /// 教师档案、360 视图与结算预估
    TeacherService
);

/// 管理员、教务或教师本人
pub(crate) fn can_view_teacher(user: &User, teacher_id: i64) -> bool {
    user.is_office() || user.teacher_id == Some(teacher_id)
}

impl TeacherService {
    pub async fn list_teachers(
        &self,
        query: TeacherListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_teachers(self, query, request).await
    }

    pub async fn create_teacher(
        &self,
        body: CreateTeacherRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_teacher(self, body, request).await
    }

    pub async fn get_teacher(
        &self,
        teacher_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_teacher(self, teacher_id, request).await
    }

    pub async fn update_teacher(
        &self,
        teacher_id: i64,
        body: UpdateTeacherRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_teacher(self, teacher_id, body, request).await
    }

    pub async fn delete_teacher(
        &self,
        teacher_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_teacher(self, teacher_id, request).await
    }

    // 360 视图
    pub async fn get_overview(
        &self,
        teacher_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        overview::get_overview(self, teacher_id, request).await
    }

    // 月度结算预估
    pub async fn get_projection(
        &self,
        teacher_id: i64,
        query: MonthQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        projection::get_projection(self, teacher_id, query, request).await
    }

    // 补登教师出勤
    pub async fn mark_attendance(
        &self,
        teacher_id: i64,
        body: MarkTeacherAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attendance::mark_attendance(self, teacher_id, body, request).await
    }
}
