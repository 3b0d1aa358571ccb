//! 学生文档实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub doc_type: String,
    pub file_name: String,
    #[sea_orm(unique)]
    pub stored_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub uploaded_by: i64,
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
    pub fn into_document(self) -> crate::models::students::entities::StudentDocument {
        crate::models::students::entities::StudentDocument {
            id: self.id,
            student_id: self.student_id,
            doc_type: self.doc_type,
            file_name: self.file_name,
            stored_name: self.stored_name,
            file_size: self.file_size,
            mime_type: self.mime_type,
            uploaded_by: self.uploaded_by,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
