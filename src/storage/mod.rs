//! 存储层抽象
//!
//! 按业务领域拆分为若干子 trait，`Storage` 汇总全部能力，
//! 路由与服务层只依赖 `Arc<dyn Storage>`。

use std::sync::Arc;

use chrono::NaiveDate;

use crate::errors::Result;
use crate::models::{
    attendance::entities::{AttendanceMark, AttendanceRecord},
    auth::entities::RefreshToken,
    batches::{
        entities::Batch,
        requests::{BatchListQuery, CreateBatchRequest, UpdateBatchRequest},
        responses::BatchListResponse,
    },
    enrollments::{
        entities::Enrollment,
        requests::{NewEnrollment, UpdateEnrollmentRequest},
    },
    evaluations::entities::{NewEvaluation, StudentEvaluation},
    finance::{
        entities::{Expense, MonthlyBudget},
        requests::{CreateExpenseRequest, ExpenseListQuery},
        responses::ExpenseListResponse,
    },
    instruments::entities::Instrument,
    notifications::{
        entities::{NewNotification, Notification},
        responses::NotificationListResponse,
    },
    packages::{
        entities::Package,
        requests::{CreatePackageRequest, UpdatePackageRequest},
    },
    payments::{
        entities::{NewPayment, Payment},
        requests::PaymentListQuery,
        responses::PaymentListResponse,
    },
    prospects::{entities::ProspectNote, requests::CreateProspectNoteRequest},
    students::{
        entities::{Guardian, NewStudentDocument, Student, StudentDocument},
        requests::{
            CreateGuardianRequest, CreateStudentRequest, StudentListQuery, UpdateStudentRequest,
        },
        responses::StudentListResponse,
    },
    teachers::{
        entities::{Teacher, TeacherAttendance, TeacherAttendanceStatus, TeacherPayout},
        requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
        responses::TeacherListResponse,
    },
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

pub mod sea_orm_storage;

/// 用户与角色
#[async_trait::async_trait]
pub trait UserStorage: Send + Sync {
    // 创建用户（password 字段已是哈希值），角色在同一事务内写入
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    async fn delete_user(&self, id: i64) -> Result<bool>;
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    async fn count_users(&self) -> Result<u64>;
    // 整体替换角色
    async fn replace_user_roles(&self, id: i64, roles: Vec<UserRole>) -> Result<Option<User>>;
    // 关联或解除教师档案，teacher_id 为 None 时解除
    async fn link_user_teacher(&self, user_id: i64, teacher_id: Option<i64>)
    -> Result<Option<User>>;
    // 拥有任一角色的活跃用户 ID
    async fn list_active_user_ids_by_roles(&self, roles: &[UserRole]) -> Result<Vec<i64>>;
}

/// 刷新令牌
#[async_trait::async_trait]
pub trait AuthStorage: Send + Sync {
    async fn create_refresh_token(
        &self,
        user_id: i64,
        token_hash: &str,
        expires_at: i64,
        user_agent: Option<String>,
    ) -> Result<RefreshToken>;
    async fn get_refresh_token_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>>;
    // 轮换：吊销旧令牌并写入新令牌，旧令牌已被并发吊销时返回 None
    async fn rotate_refresh_token(
        &self,
        old: &RefreshToken,
        new_hash: &str,
        expires_at: i64,
        user_agent: Option<String>,
    ) -> Result<Option<RefreshToken>>;
    async fn revoke_refresh_token(&self, id: i64) -> Result<bool>;
    async fn revoke_all_user_tokens(&self, user_id: i64) -> Result<u64>;
    // 删除已过期或已吊销的令牌
    async fn cleanup_refresh_tokens(&self, now: i64) -> Result<u64>;
}

/// 教师档案
#[async_trait::async_trait]
pub trait TeacherStorage: Send + Sync {
    async fn create_teacher(&self, teacher: CreateTeacherRequest) -> Result<Teacher>;
    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>>;
    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse>;
    async fn list_active_teachers(&self) -> Result<Vec<Teacher>>;
    async fn update_teacher(&self, id: i64, update: UpdateTeacherRequest)
    -> Result<Option<Teacher>>;
    async fn delete_teacher(&self, id: i64) -> Result<bool>;
}

/// 乐器
#[async_trait::async_trait]
pub trait InstrumentStorage: Send + Sync {
    async fn create_instrument(&self, name: &str) -> Result<Instrument>;
    async fn get_instrument_by_id(&self, id: i64) -> Result<Option<Instrument>>;
    async fn get_instrument_by_name(&self, name: &str) -> Result<Option<Instrument>>;
    async fn list_instruments(&self) -> Result<Vec<Instrument>>;
    // 被班次、报名或课包引用的次数
    async fn count_instrument_usage(&self, id: i64) -> Result<i64>;
    async fn delete_instrument(&self, id: i64) -> Result<bool>;
}

/// 班次
#[async_trait::async_trait]
pub trait BatchStorage: Send + Sync {
    // recurrence 需已规范化
    async fn create_batch(&self, batch: CreateBatchRequest) -> Result<Batch>;
    async fn get_batch_by_id(&self, id: i64) -> Result<Option<Batch>>;
    async fn get_batches_by_ids(&self, ids: &[i64]) -> Result<Vec<Batch>>;
    async fn list_batches_with_pagination(&self, query: BatchListQuery)
    -> Result<BatchListResponse>;
    async fn list_teacher_batches(&self, teacher_id: i64, active_only: bool)
    -> Result<Vec<Batch>>;
    async fn update_batch(&self, id: i64, update: UpdateBatchRequest) -> Result<Option<Batch>>;
    async fn delete_batch(&self, id: i64) -> Result<bool>;
    // 班次内的报名及对应学生
    async fn list_batch_roster(&self, batch_id: i64) -> Result<Vec<(Enrollment, Student)>>;
    async fn count_batch_active_enrollments(&self, batch_id: i64) -> Result<i64>;
}

/// 学生、监护人与文档
#[async_trait::async_trait]
pub trait StudentStorage: Send + Sync {
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    async fn update_student(&self, id: i64, update: UpdateStudentRequest)
    -> Result<Option<Student>>;
    async fn delete_student(&self, id: i64) -> Result<bool>;

    async fn create_guardian(
        &self,
        student_id: i64,
        guardian: CreateGuardianRequest,
    ) -> Result<Guardian>;
    async fn list_guardians(&self, student_id: i64) -> Result<Vec<Guardian>>;
    async fn delete_guardian(&self, student_id: i64, guardian_id: i64) -> Result<bool>;

    async fn create_document(&self, document: NewStudentDocument) -> Result<StudentDocument>;
    async fn list_documents(&self, student_id: i64) -> Result<Vec<StudentDocument>>;
    async fn get_document(
        &self,
        student_id: i64,
        document_id: i64,
    ) -> Result<Option<StudentDocument>>;
    async fn delete_document(&self, student_id: i64, document_id: i64) -> Result<bool>;
}

/// 报名
#[async_trait::async_trait]
pub trait EnrollmentStorage: Send + Sync {
    // 单事务写入报名与班次关联，超出班次容量时返回 Conflict
    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment>;
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    async fn list_student_enrollments(&self, student_id: i64) -> Result<Vec<Enrollment>>;
    async fn update_enrollment(
        &self,
        id: i64,
        update: UpdateEnrollmentRequest,
    ) -> Result<Option<Enrollment>>;
    async fn replace_enrollment_batches(
        &self,
        id: i64,
        batch_ids: Vec<i64>,
    ) -> Result<Option<Enrollment>>;
    async fn delete_enrollment(&self, id: i64) -> Result<bool>;
}

/// 课包
#[async_trait::async_trait]
pub trait PackageStorage: Send + Sync {
    async fn create_package(&self, package: CreatePackageRequest) -> Result<Package>;
    async fn get_package_by_id(&self, id: i64) -> Result<Option<Package>>;
    async fn get_package_by_name(&self, name: &str) -> Result<Option<Package>>;
    async fn list_packages(&self, active_only: bool) -> Result<Vec<Package>>;
    async fn update_package(&self, id: i64, update: UpdatePackageRequest)
    -> Result<Option<Package>>;
    async fn delete_package(&self, id: i64) -> Result<bool>;
}

/// 收款
#[async_trait::async_trait]
pub trait PaymentStorage: Send + Sync {
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment>;
    async fn get_payment_by_id(&self, id: i64) -> Result<Option<Payment>>;
    async fn list_payments_with_pagination(
        &self,
        query: PaymentListQuery,
    ) -> Result<PaymentListResponse>;
    async fn list_student_payments(&self, student_id: i64) -> Result<Vec<Payment>>;
    async fn list_payments_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Payment>>;
    async fn delete_payment(&self, id: i64) -> Result<bool>;
}

/// 学生与教师出勤
#[async_trait::async_trait]
pub trait AttendanceStorage: Send + Sync {
    // 单事务写入学生出勤并把教师出勤置为 present
    async fn mark_batch_attendance(
        &self,
        batch_id: i64,
        teacher_id: i64,
        date: NaiveDate,
        marks: Vec<AttendanceMark>,
        marked_by: i64,
    ) -> Result<Vec<AttendanceRecord>>;
    async fn list_batch_attendance(
        &self,
        batch_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>>;
    async fn list_student_attendance(&self, student_id: i64) -> Result<Vec<AttendanceRecord>>;
    async fn list_enrollment_attendance(&self, enrollment_id: i64)
    -> Result<Vec<AttendanceRecord>>;

    async fn upsert_teacher_attendance(
        &self,
        teacher_id: i64,
        batch_id: i64,
        date: NaiveDate,
        status: TeacherAttendanceStatus,
        marked_by: i64,
    ) -> Result<TeacherAttendance>;
    async fn get_teacher_attendance(
        &self,
        batch_id: i64,
        date: NaiveDate,
    ) -> Result<Option<TeacherAttendance>>;
    async fn list_teacher_attendance(
        &self,
        teacher_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TeacherAttendance>>;
}

/// 支出、预算与教师结算
#[async_trait::async_trait]
pub trait FinanceStorage: Send + Sync {
    async fn create_expense(&self, expense: CreateExpenseRequest, recorded_by: i64)
    -> Result<Expense>;
    async fn list_expenses_with_pagination(
        &self,
        query: ExpenseListQuery,
    ) -> Result<ExpenseListResponse>;
    async fn list_expenses_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Expense>>;
    async fn delete_expense(&self, id: i64) -> Result<bool>;

    async fn upsert_budget(&self, month: &str, category: &str, amount: i64)
    -> Result<MonthlyBudget>;
    async fn list_budgets(&self, month: &str) -> Result<Vec<MonthlyBudget>>;

    async fn list_payouts(
        &self,
        teacher_id: Option<i64>,
        period: Option<&str>,
    ) -> Result<Vec<TeacherPayout>>;
    async fn get_payout_by_id(&self, id: i64) -> Result<Option<TeacherPayout>>;
    // 已存在同周期记录时返回 None
    async fn create_payout_if_absent(
        &self,
        teacher_id: i64,
        period: &str,
        sessions: i32,
        amount: i64,
    ) -> Result<Option<TeacherPayout>>;
    /// 仅 pending 状态可标记；已付款时返回 Conflict
    async fn mark_payout_paid(
        &self,
        id: i64,
        paid_on: NaiveDate,
        notes: Option<String>,
    ) -> Result<Option<TeacherPayout>>;
}

/// 学生评估
#[async_trait::async_trait]
pub trait EvaluationStorage: Send + Sync {
    async fn create_evaluation(&self, evaluation: NewEvaluation) -> Result<StudentEvaluation>;
    async fn list_student_evaluations(&self, student_id: i64) -> Result<Vec<StudentEvaluation>>;
    async fn list_teacher_evaluations(
        &self,
        teacher_id: i64,
        limit: u64,
    ) -> Result<Vec<StudentEvaluation>>;
}

/// 潜在学员跟进
#[async_trait::async_trait]
pub trait ProspectStorage: Send + Sync {
    async fn create_prospect_note(
        &self,
        student_id: i64,
        author_id: i64,
        note: CreateProspectNoteRequest,
    ) -> Result<ProspectNote>;
    async fn list_prospect_notes(&self, student_id: i64) -> Result<Vec<ProspectNote>>;
}

/// 站内通知
#[async_trait::async_trait]
pub trait NotificationStorage: Send + Sync {
    async fn create_notifications(&self, items: Vec<NewNotification>)
    -> Result<Vec<Notification>>;
    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        unread_only: bool,
        page: i64,
        size: i64,
    ) -> Result<NotificationListResponse>;
    async fn count_unread_notifications(&self, user_id: i64) -> Result<i64>;
    async fn mark_notification_read(&self, user_id: i64, id: i64) -> Result<bool>;
    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64>;
    async fn delete_notification(&self, user_id: i64, id: i64) -> Result<bool>;
    // 删除早于 before 的已读通知
    async fn cleanup_read_notifications(&self, before: i64) -> Result<u64>;
}

/// 健康检查
#[async_trait::async_trait]
pub trait SystemStorage: Send + Sync {
    async fn ping(&self) -> Result<()>;
}

/// 全部存储能力
pub trait Storage:
    UserStorage
    + AuthStorage
    + TeacherStorage
    + InstrumentStorage
    + BatchStorage
    + StudentStorage
    + EnrollmentStorage
    + PackageStorage
    + PaymentStorage
    + AttendanceStorage
    + FinanceStorage
    + EvaluationStorage
    + ProspectStorage
    + NotificationStorage
    + SystemStorage
{
}

impl<T> Storage for T where
    T: UserStorage
        + AuthStorage
        + TeacherStorage
        + InstrumentStorage
        + BatchStorage
        + StudentStorage
        + EnrollmentStorage
        + PackageStorage
        + PaymentStorage
        + AttendanceStorage
        + FinanceStorage
        + EvaluationStorage
        + ProspectStorage
        + NotificationStorage
        + SystemStorage
{
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
