use sea_orm_migration::prelude::*;

use crate::{id_col, timestamp_col};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id_col(Users::Id))
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().null())
                    .col(ColumnDef::new(Users::DisplayName).string().not_null())
                    .col(ColumnDef::new(Users::AvatarUrl).string().null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(timestamp_col(Users::CreatedAt))
                    .col(timestamp_col(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // 用户角色表
        manager
            .create_table(
                Table::create()
                    .table(UserRoles::Table)
                    .if_not_exists()
                    .col(id_col(UserRoles::Id))
                    .col(ColumnDef::new(UserRoles::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UserRoles::Role).string().not_null())
                    .col(timestamp_col(UserRoles::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserRoles::Table, UserRoles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 刷新令牌表
        manager
            .create_table(
                Table::create()
                    .table(RefreshTokens::Table)
                    .if_not_exists()
                    .col(id_col(RefreshTokens::Id))
                    .col(
                        ColumnDef::new(RefreshTokens::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RefreshTokens::TokenHash)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(timestamp_col(RefreshTokens::ExpiresAt))
                    .col(
                        ColumnDef::new(RefreshTokens::RevokedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RefreshTokens::ReplacedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(RefreshTokens::UserAgent).string().null())
                    .col(timestamp_col(RefreshTokens::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(RefreshTokens::Table, RefreshTokens::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 教师表
        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(id_col(Teachers::Id))
                    .col(ColumnDef::new(Teachers::Name).string().not_null())
                    .col(ColumnDef::new(Teachers::Email).string().null())
                    .col(ColumnDef::new(Teachers::Phone).string().null())
                    .col(ColumnDef::new(Teachers::PayoutType).string().not_null())
                    .col(ColumnDef::new(Teachers::Rate).big_integer().not_null())
                    .col(ColumnDef::new(Teachers::Status).string().not_null())
                    .col(ColumnDef::new(Teachers::JoinedOn).date().null())
                    .col(ColumnDef::new(Teachers::Notes).text().null())
                    .col(timestamp_col(Teachers::CreatedAt))
                    .col(timestamp_col(Teachers::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // 教师与登录账号关联表
        manager
            .create_table(
                Table::create()
                    .table(TeacherUsers::Table)
                    .if_not_exists()
                    .col(id_col(TeacherUsers::Id))
                    .col(
                        ColumnDef::new(TeacherUsers::TeacherId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(TeacherUsers::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(timestamp_col(TeacherUsers::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherUsers::Table, TeacherUsers::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherUsers::Table, TeacherUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 乐器表
        manager
            .create_table(
                Table::create()
                    .table(Instruments::Table)
                    .if_not_exists()
                    .col(id_col(Instruments::Id))
                    .col(
                        ColumnDef::new(Instruments::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(timestamp_col(Instruments::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // 班次表
        manager
            .create_table(
                Table::create()
                    .table(Batches::Table)
                    .if_not_exists()
                    .col(id_col(Batches::Id))
                    .col(ColumnDef::new(Batches::Name).string().not_null())
                    .col(
                        ColumnDef::new(Batches::InstrumentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Batches::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Batches::Recurrence).string().not_null())
                    .col(ColumnDef::new(Batches::Capacity).integer().not_null())
                    .col(ColumnDef::new(Batches::Status).string().not_null())
                    .col(timestamp_col(Batches::CreatedAt))
                    .col(timestamp_col(Batches::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Batches::Table, Batches::InstrumentId)
                            .to(Instruments::Table, Instruments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Batches::Table, Batches::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(id_col(Students::Id))
                    .col(ColumnDef::new(Students::FirstName).string().not_null())
                    .col(ColumnDef::new(Students::LastName).string().not_null())
                    .col(ColumnDef::new(Students::DateOfBirth).date().null())
                    .col(ColumnDef::new(Students::Email).string().null())
                    .col(ColumnDef::new(Students::Phone).string().null())
                    .col(ColumnDef::new(Students::Status).string().not_null())
                    .col(ColumnDef::new(Students::Source).string().null())
                    .col(ColumnDef::new(Students::Metadata).text().null())
                    .col(ColumnDef::new(Students::Notes).text().null())
                    .col(timestamp_col(Students::CreatedAt))
                    .col(timestamp_col(Students::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // 学生监护人表
        manager
            .create_table(
                Table::create()
                    .table(StudentGuardians::Table)
                    .if_not_exists()
                    .col(id_col(StudentGuardians::Id))
                    .col(
                        ColumnDef::new(StudentGuardians::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentGuardians::Name).string().not_null())
                    .col(
                        ColumnDef::new(StudentGuardians::Relation)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentGuardians::Phone).string().null())
                    .col(ColumnDef::new(StudentGuardians::Email).string().null())
                    .col(
                        ColumnDef::new(StudentGuardians::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(timestamp_col(StudentGuardians::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentGuardians::Table, StudentGuardians::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 学生文档表
        manager
            .create_table(
                Table::create()
                    .table(StudentDocuments::Table)
                    .if_not_exists()
                    .col(id_col(StudentDocuments::Id))
                    .col(
                        ColumnDef::new(StudentDocuments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentDocuments::DocType).string().not_null())
                    .col(
                        ColumnDef::new(StudentDocuments::FileName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentDocuments::StoredName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(StudentDocuments::FileSize)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentDocuments::MimeType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentDocuments::UploadedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(timestamp_col(StudentDocuments::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentDocuments::Table, StudentDocuments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 课程包表
        manager
            .create_table(
                Table::create()
                    .table(Packages::Table)
                    .if_not_exists()
                    .col(id_col(Packages::Id))
                    .col(
                        ColumnDef::new(Packages::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Packages::InstrumentId).big_integer().null())
                    .col(ColumnDef::new(Packages::ClassesCount).integer().not_null())
                    .col(ColumnDef::new(Packages::Price).big_integer().not_null())
                    .col(ColumnDef::new(Packages::ValidityDays).integer().not_null())
                    .col(
                        ColumnDef::new(Packages::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp_col(Packages::CreatedAt))
                    .col(timestamp_col(Packages::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Packages::Table, Packages::InstrumentId)
                            .to(Instruments::Table, Instruments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 报名表
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(id_col(Enrollments::Id))
                    .col(
                        ColumnDef::new(Enrollments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::InstrumentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Enrollments::PackageId).big_integer().null())
                    .col(ColumnDef::new(Enrollments::Status).string().not_null())
                    .col(ColumnDef::new(Enrollments::StartDate).date().not_null())
                    .col(ColumnDef::new(Enrollments::EndDate).date().null())
                    .col(timestamp_col(Enrollments::CreatedAt))
                    .col(timestamp_col(Enrollments::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::InstrumentId)
                            .to(Instruments::Table, Instruments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::PackageId)
                            .to(Packages::Table, Packages::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 报名与班次关联表
        manager
            .create_table(
                Table::create()
                    .table(EnrollmentBatches::Table)
                    .if_not_exists()
                    .col(id_col(EnrollmentBatches::Id))
                    .col(
                        ColumnDef::new(EnrollmentBatches::EnrollmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentBatches::BatchId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(timestamp_col(EnrollmentBatches::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(EnrollmentBatches::Table, EnrollmentBatches::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EnrollmentBatches::Table, EnrollmentBatches::BatchId)
                            .to(Batches::Table, Batches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_user_roles_user_role")
                    .table(UserRoles::Table)
                    .col(UserRoles::UserId)
                    .col(UserRoles::Role)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_enrollment_batches_pair")
                    .table(EnrollmentBatches::Table)
                    .col(EnrollmentBatches::EnrollmentId)
                    .col(EnrollmentBatches::BatchId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 普通索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_refresh_tokens_user_id")
                    .table(RefreshTokens::Table)
                    .col(RefreshTokens::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_batches_teacher_id")
                    .table(Batches::Table)
                    .col(Batches::TeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_status")
                    .table(Students::Table)
                    .col(Students::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_student_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(EnrollmentBatches::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Packages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentDocuments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentGuardians::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Batches::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Instruments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeacherUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RefreshTokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Email,
    PasswordHash,
    DisplayName,
    AvatarUrl,
    Status,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserRoles {
    #[sea_orm(iden = "user_roles")]
    Table,
    Id,
    UserId,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RefreshTokens {
    #[sea_orm(iden = "refresh_tokens")]
    Table,
    Id,
    UserId,
    TokenHash,
    ExpiresAt,
    RevokedAt,
    ReplacedBy,
    UserAgent,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Teachers {
    #[sea_orm(iden = "teachers")]
    Table,
    Id,
    Name,
    Email,
    Phone,
    PayoutType,
    Rate,
    Status,
    JoinedOn,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TeacherUsers {
    #[sea_orm(iden = "teacher_users")]
    Table,
    Id,
    TeacherId,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Instruments {
    #[sea_orm(iden = "instruments")]
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Batches {
    #[sea_orm(iden = "batches")]
    Table,
    Id,
    Name,
    InstrumentId,
    TeacherId,
    Recurrence,
    Capacity,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    FirstName,
    LastName,
    DateOfBirth,
    Email,
    Phone,
    Status,
    Source,
    Metadata,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StudentGuardians {
    #[sea_orm(iden = "student_guardians")]
    Table,
    Id,
    StudentId,
    Name,
    Relation,
    Phone,
    Email,
    IsPrimary,
    CreatedAt,
}

#[derive(DeriveIden)]
enum StudentDocuments {
    #[sea_orm(iden = "student_documents")]
    Table,
    Id,
    StudentId,
    DocType,
    FileName,
    StoredName,
    FileSize,
    MimeType,
    UploadedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Packages {
    #[sea_orm(iden = "packages")]
    Table,
    Id,
    Name,
    InstrumentId,
    ClassesCount,
    Price,
    ValidityDays,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Enrollments {
    #[sea_orm(iden = "enrollments")]
    Table,
    Id,
    StudentId,
    InstrumentId,
    PackageId,
    Status,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EnrollmentBatches {
    #[sea_orm(iden = "enrollment_batches")]
    Table,
    Id,
    EnrollmentId,
    BatchId,
    CreatedAt,
}
