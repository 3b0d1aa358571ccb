//! 预导入模块，方便使用

pub use super::attendance_records::Entity as AttendanceRecords;
pub use super::batches::Entity as Batches;
pub use super::enrollment_batches::Entity as EnrollmentBatches;
pub use super::enrollments::Entity as Enrollments;
pub use super::expenses::Entity as Expenses;
pub use super::instruments::Entity as Instruments;
pub use super::monthly_budgets::Entity as MonthlyBudgets;
pub use super::notifications::Entity as Notifications;
pub use super::packages::Entity as Packages;
pub use super::payments::Entity as Payments;
pub use super::prospect_notes::Entity as ProspectNotes;
pub use super::refresh_tokens::Entity as RefreshTokens;
pub use super::student_documents::Entity as StudentDocuments;
pub use super::student_evaluations::Entity as StudentEvaluations;
pub use super::student_guardians::Entity as StudentGuardians;
pub use super::students::Entity as Students;
pub use super::teacher_attendance::Entity as TeacherAttendance;
pub use super::teacher_payouts::Entity as TeacherPayouts;
pub use super::teacher_users::Entity as TeacherUsers;
pub use super::teachers::Entity as Teachers;
pub use super::user_roles::Entity as UserRoles;
pub use super::users::Entity as Users;
