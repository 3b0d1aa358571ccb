//! 收款实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub enrollment_id: Option<i64>,
    pub package_id: Option<i64>,
    pub amount: i64,
    pub credits: i32,
    pub method: String,
    pub paid_on: Date,
    pub reference: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub recorded_by: i64,
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
    pub fn into_payment(self) -> crate::models::payments::entities::Payment {
        use crate::models::payments::entities::{Payment, PaymentMethod};

        Payment {
            id: self.id,
            student_id: self.student_id,
            enrollment_id: self.enrollment_id,
            package_id: self.package_id,
            amount: self.amount,
            credits: self.credits,
            method: self
                .method
                .parse::<PaymentMethod>()
                .unwrap_or(PaymentMethod::Other),
            paid_on: self.paid_on,
            reference: self.reference,
            notes: self.notes,
            recorded_by: self.recorded_by,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
