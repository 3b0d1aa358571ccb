use sea_orm_migration::prelude::*;

use crate::m20260301_000001_create_core_tables::{
    Batches, Enrollments, Packages, Students, Teachers, Users,
};
use crate::{id_col, timestamp_col};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 缴费表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(id_col(Payments::Id))
                    .col(ColumnDef::new(Payments::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::EnrollmentId).big_integer().null())
                    .col(ColumnDef::new(Payments::PackageId).big_integer().null())
                    .col(ColumnDef::new(Payments::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Payments::Credits).integer().not_null())
                    .col(ColumnDef::new(Payments::Method).string().not_null())
                    .col(ColumnDef::new(Payments::PaidOn).date().not_null())
                    .col(ColumnDef::new(Payments::Reference).string().null())
                    .col(ColumnDef::new(Payments::Notes).text().null())
                    .col(
                        ColumnDef::new(Payments::RecordedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(timestamp_col(Payments::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::PackageId)
                            .to(Packages::Table, Packages::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 支出表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(id_col(Expenses::Id))
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(ColumnDef::new(Expenses::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Expenses::SpentOn).date().not_null())
                    .col(ColumnDef::new(Expenses::Description).text().null())
                    .col(
                        ColumnDef::new(Expenses::RecordedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(timestamp_col(Expenses::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // ==================== 月度预算表 ====================
        manager
            .create_table(
                Table::create()
                    .table(MonthlyBudgets::Table)
                    .if_not_exists()
                    .col(id_col(MonthlyBudgets::Id))
                    .col(ColumnDef::new(MonthlyBudgets::Month).string().not_null())
                    .col(ColumnDef::new(MonthlyBudgets::Category).string().not_null())
                    .col(
                        ColumnDef::new(MonthlyBudgets::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(timestamp_col(MonthlyBudgets::CreatedAt))
                    .col(timestamp_col(MonthlyBudgets::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // ==================== 通知表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(id_col(Notifications::Id))
                    .col(
                        ColumnDef::new(Notifications::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::Kind).string().not_null())
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Body).text().null())
                    .col(ColumnDef::new(Notifications::Link).string().null())
                    .col(
                        ColumnDef::new(Notifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(timestamp_col(Notifications::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 教师考勤表 ====================
        manager
            .create_table(
                Table::create()
                    .table(TeacherAttendance::Table)
                    .if_not_exists()
                    .col(id_col(TeacherAttendance::Id))
                    .col(
                        ColumnDef::new(TeacherAttendance::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherAttendance::BatchId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TeacherAttendance::Date).date().not_null())
                    .col(ColumnDef::new(TeacherAttendance::Status).string().not_null())
                    .col(
                        ColumnDef::new(TeacherAttendance::MarkedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(timestamp_col(TeacherAttendance::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherAttendance::Table, TeacherAttendance::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherAttendance::Table, TeacherAttendance::BatchId)
                            .to(Batches::Table, Batches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 学生考勤表 ====================
        manager
            .create_table(
                Table::create()
                    .table(AttendanceRecords::Table)
                    .if_not_exists()
                    .col(id_col(AttendanceRecords::Id))
                    .col(
                        ColumnDef::new(AttendanceRecords::EnrollmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::BatchId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AttendanceRecords::Date).date().not_null())
                    .col(ColumnDef::new(AttendanceRecords::Status).string().not_null())
                    .col(
                        ColumnDef::new(AttendanceRecords::MarkedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(timestamp_col(AttendanceRecords::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceRecords::Table, AttendanceRecords::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceRecords::Table, AttendanceRecords::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceRecords::Table, AttendanceRecords::BatchId)
                            .to(Batches::Table, Batches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 学生评估表 ====================
        manager
            .create_table(
                Table::create()
                    .table(StudentEvaluations::Table)
                    .if_not_exists()
                    .col(id_col(StudentEvaluations::Id))
                    .col(
                        ColumnDef::new(StudentEvaluations::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentEvaluations::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentEvaluations::EnrollmentId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(StudentEvaluations::EvaluatedOn)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentEvaluations::Technique)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentEvaluations::Theory).integer().not_null())
                    .col(ColumnDef::new(StudentEvaluations::Rhythm).integer().not_null())
                    .col(
                        ColumnDef::new(StudentEvaluations::Performance)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentEvaluations::Remarks).text().null())
                    .col(timestamp_col(StudentEvaluations::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentEvaluations::Table, StudentEvaluations::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentEvaluations::Table, StudentEvaluations::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 教师结算表 ====================
        manager
            .create_table(
                Table::create()
                    .table(TeacherPayouts::Table)
                    .if_not_exists()
                    .col(id_col(TeacherPayouts::Id))
                    .col(
                        ColumnDef::new(TeacherPayouts::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TeacherPayouts::Period).string().not_null())
                    .col(ColumnDef::new(TeacherPayouts::Sessions).integer().not_null())
                    .col(
                        ColumnDef::new(TeacherPayouts::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TeacherPayouts::Status).string().not_null())
                    .col(ColumnDef::new(TeacherPayouts::PaidOn).date().null())
                    .col(ColumnDef::new(TeacherPayouts::Notes).text().null())
                    .col(timestamp_col(TeacherPayouts::CreatedAt))
                    .col(timestamp_col(TeacherPayouts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherPayouts::Table, TeacherPayouts::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 意向学员跟进表 ====================
        manager
            .create_table(
                Table::create()
                    .table(ProspectNotes::Table)
                    .if_not_exists()
                    .col(id_col(ProspectNotes::Id))
                    .col(
                        ColumnDef::new(ProspectNotes::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProspectNotes::AuthorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProspectNotes::Note).text().not_null())
                    .col(ColumnDef::new(ProspectNotes::FollowUpOn).date().null())
                    .col(timestamp_col(ProspectNotes::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(ProspectNotes::Table, ProspectNotes::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 唯一约束 ====================
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_monthly_budgets_month_category")
                    .table(MonthlyBudgets::Table)
                    .col(MonthlyBudgets::Month)
                    .col(MonthlyBudgets::Category)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_teacher_attendance_batch_date")
                    .table(TeacherAttendance::Table)
                    .col(TeacherAttendance::BatchId)
                    .col(TeacherAttendance::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_attendance_records_slot")
                    .table(AttendanceRecords::Table)
                    .col(AttendanceRecords::EnrollmentId)
                    .col(AttendanceRecords::BatchId)
                    .col(AttendanceRecords::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_teacher_payouts_period")
                    .table(TeacherPayouts::Table)
                    .col(TeacherPayouts::TeacherId)
                    .col(TeacherPayouts::Period)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ==================== 查询索引 ====================
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payments_student_id")
                    .table(Payments::Table)
                    .col(Payments::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notifications_user_id")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::IsRead)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendance_records_student_id")
                    .table(AttendanceRecords::Table)
                    .col(AttendanceRecords::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProspectNotes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeacherPayouts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentEvaluations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttendanceRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeacherAttendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MonthlyBudgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Payments {
    #[sea_orm(iden = "payments")]
    Table,
    Id,
    StudentId,
    EnrollmentId,
    PackageId,
    Amount,
    Credits,
    Method,
    PaidOn,
    Reference,
    Notes,
    RecordedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Expenses {
    #[sea_orm(iden = "expenses")]
    Table,
    Id,
    Category,
    Amount,
    SpentOn,
    Description,
    RecordedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MonthlyBudgets {
    #[sea_orm(iden = "monthly_budgets")]
    Table,
    Id,
    Month,
    Category,
    Amount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    #[sea_orm(iden = "notifications")]
    Table,
    Id,
    UserId,
    Kind,
    Title,
    Body,
    Link,
    IsRead,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TeacherAttendance {
    #[sea_orm(iden = "teacher_attendance")]
    Table,
    Id,
    TeacherId,
    BatchId,
    Date,
    Status,
    MarkedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AttendanceRecords {
    #[sea_orm(iden = "attendance_records")]
    Table,
    Id,
    EnrollmentId,
    StudentId,
    BatchId,
    Date,
    Status,
    MarkedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum StudentEvaluations {
    #[sea_orm(iden = "student_evaluations")]
    Table,
    Id,
    StudentId,
    TeacherId,
    EnrollmentId,
    EvaluatedOn,
    Technique,
    Theory,
    Rhythm,
    Performance,
    Remarks,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TeacherPayouts {
    #[sea_orm(iden = "teacher_payouts")]
    Table,
    Id,
    TeacherId,
    Period,
    Sessions,
    Amount,
    Status,
    PaidOn,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProspectNotes {
    #[sea_orm(iden = "prospect_notes")]
    Table,
    Id,
    StudentId,
    AuthorId,
    Note,
    FollowUpOn,
    CreatedAt,
}
