//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod attendance_records;
pub mod batches;
pub mod enrollment_batches;
pub mod enrollments;
pub mod expenses;
pub mod instruments;
pub mod monthly_budgets;
pub mod notifications;
pub mod packages;
pub mod payments;
pub mod prospect_notes;
pub mod refresh_tokens;
pub mod student_documents;
pub mod student_evaluations;
pub mod student_guardians;
pub mod students;
pub mod teacher_attendance;
pub mod teacher_payouts;
pub mod teacher_users;
pub mod teachers;
pub mod user_roles;
pub mod users;

use chrono::{DateTime, Utc};

/// Unix 秒转为 UTC 时间
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
