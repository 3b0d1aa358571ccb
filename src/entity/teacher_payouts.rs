//! 教师结算实体，(teacher_id, period) 唯一

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher_payouts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub period: String,
    pub sessions: i32,
    pub amount: i64,
    pub status: String,
    pub paid_on: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
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
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payout(self) -> crate::models::teachers::entities::TeacherPayout {
        use super::to_datetime;
        use crate::models::teachers::entities::{PayoutStatus, TeacherPayout};

        TeacherPayout {
            id: self.id,
            teacher_id: self.teacher_id,
            period: self.period,
            sessions: self.sessions,
            amount: self.amount,
            status: self
                .status
                .parse::<PayoutStatus>()
                .unwrap_or(PayoutStatus::Pending),
            paid_on: self.paid_on,
            notes: self.notes,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
