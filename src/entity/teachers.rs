//! 教师实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub payout_type: String,
    pub rate: i64,
    pub status: String,
    pub joined_on: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::batches::Entity")]
    Batches,
    #[sea_orm(has_one = "super::teacher_users::Entity")]
    TeacherUser,
    #[sea_orm(has_many = "super::teacher_payouts::Entity")]
    Payouts,
}

impl Related<super::batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batches.def()
    }
}

impl Related<super::teacher_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeacherUser.def()
    }
}

impl Related<super::teacher_payouts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payouts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_teacher(self, user_id: Option<i64>) -> crate::models::teachers::entities::Teacher {
        use super::to_datetime;
        use crate::models::teachers::entities::{PayoutType, Teacher, TeacherStatus};

        Teacher {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            payout_type: self
                .payout_type
                .parse::<PayoutType>()
                .unwrap_or(PayoutType::PerClass),
            rate: self.rate,
            status: self
                .status
                .parse::<TeacherStatus>()
                .unwrap_or(TeacherStatus::Inactive),
            joined_on: self.joined_on,
            notes: self.notes,
            user_id,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
