//! 支出实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub category: String,
    pub amount: i64,
    pub spent_on: Date,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub recorded_by: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_expense(self) -> crate::models::finance::entities::Expense {
        crate::models::finance::entities::Expense {
            id: self.id,
            category: self.category,
            amount: self.amount,
            spent_on: self.spent_on,
            description: self.description,
            recorded_by: self.recorded_by,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
