//! 教师出勤实体，(batch_id, date) 唯一

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher_attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub batch_id: i64,
    pub date: Date,
    pub status: String,
    pub marked_by: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::TeacherId",
        to = "super::teachers::Column::Id",
        on_delete = "Cascade"
    )]
    Teacher,
    #[sea_orm(
        belongs_to = "super::batches::Entity",
        from = "Column::BatchId",
        to = "super::batches::Column::Id",
        on_delete = "Cascade"
    )]
    Batch,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_teacher_attendance(self) -> crate::models::teachers::entities::TeacherAttendance {
        use crate::models::teachers::entities::{TeacherAttendance, TeacherAttendanceStatus};

        TeacherAttendance {
            id: self.id,
            teacher_id: self.teacher_id,
            batch_id: self.batch_id,
            date: self.date,
            status: self
                .status
                .parse::<TeacherAttendanceStatus>()
                .unwrap_or(TeacherAttendanceStatus::Absent),
            marked_by: self.marked_by,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
