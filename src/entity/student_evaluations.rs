//! 学生评估实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_evaluations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub enrollment_id: Option<i64>,
    pub evaluated_on: Date,
    pub technique: i32,
    pub theory: i32,
    pub rhythm: i32,
    pub performance: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_evaluation(self) -> crate::models::evaluations::entities::StudentEvaluation {
        crate::models::evaluations::entities::StudentEvaluation {
            id: self.id,
            student_id: self.student_id,
            teacher_id: self.teacher_id,
            enrollment_id: self.enrollment_id,
            evaluated_on: self.evaluated_on,
            technique: self.technique,
            theory: self.theory,
            rhythm: self.rhythm,
            performance: self.performance,
            remarks: self.remarks,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
