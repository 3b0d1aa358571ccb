pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_core_tables;
mod m20260301_000002_create_operation_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_core_tables::Migration),
            Box::new(m20260301_000002_create_operation_tables::Migration),
        ]
    }
}

/// 自增主键列
pub(crate) fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

/// Unix 秒时间戳列
pub(crate) fn timestamp_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).big_integer().not_null().to_owned()
}
