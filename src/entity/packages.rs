//! 课程包实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "packages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub instrument_id: Option<i64>,
    pub classes_count: i32,
    pub price: i64,
    pub validity_days: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::instruments::Entity",
        from = "Column::InstrumentId",
        to = "super::instruments::Column::Id",
        on_delete = "SetNull"
    )]
    Instrument,
}

impl Related<super::instruments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instrument.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_package(self) -> crate::models::packages::entities::Package {
        use super::to_datetime;

        crate::models::packages::entities::Package {
            id: self.id,
            name: self.name,
            instrument_id: self.instrument_id,
            classes_count: self.classes_count,
            price: self.price,
            validity_days: self.validity_days,
            is_active: self.is_active,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
