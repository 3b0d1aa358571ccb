//! 潜在学员跟进记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "prospect_notes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub author_id: i64,
    #[sea_orm(column_type = "Text")]
    pub note: String,
    pub follow_up_on: Option<Date>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_note(self) -> crate::models::prospects::entities::ProspectNote {
        crate::models::prospects::entities::ProspectNote {
            id: self.id,
            student_id: self.student_id,
            author_id: self.author_id,
            note: self.note,
            follow_up_on: self.follow_up_on,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
