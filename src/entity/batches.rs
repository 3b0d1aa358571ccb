//! 班次实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "batches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub instrument_id: i64,
    pub teacher_id: i64,
    pub recurrence: String,
    pub capacity: i32,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::instruments::Entity",
        from = "Column::InstrumentId",
        to = "super::instruments::Column::Id"
    )]
    Instrument,
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::TeacherId",
        to = "super::teachers::Column::Id"
    )]
    Teacher,
    #[sea_orm(has_many = "super::enrollment_batches::Entity")]
    EnrollmentBatches,
}

impl Related<super::instruments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instrument.def()
    }
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::enrollment_batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnrollmentBatches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_batch(self) -> crate::models::batches::entities::Batch {
        use super::to_datetime;
        use crate::models::batches::entities::{Batch, BatchStatus};

        Batch {
            id: self.id,
            name: self.name,
            instrument_id: self.instrument_id,
            teacher_id: self.teacher_id,
            recurrence: self.recurrence,
            capacity: self.capacity,
            status: self
                .status
                .parse::<BatchStatus>()
                .unwrap_or(BatchStatus::Archived),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
