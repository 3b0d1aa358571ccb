//! 乐器存储操作

use super::{SeaOrmStorage, db_err, now_ts};
use crate::entity::instruments::{ActiveModel, Column, Entity as Instruments};
use crate::entity::{batches, enrollments, packages};
use crate::errors::Result;
use crate::models::instruments::entities::Instrument;
use crate::storage::InstrumentStorage;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

#[async_trait]
impl InstrumentStorage for SeaOrmStorage {
    async fn create_instrument(&self, name: &str) -> Result<Instrument> {
        let model = ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(now_ts()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("创建乐器失败"))?;
        Ok(model.into_instrument())
    }

    async fn get_instrument_by_id(&self, id: i64) -> Result<Option<Instrument>> {
        let model = Instruments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询乐器失败"))?;
        Ok(model.map(|m| m.into_instrument()))
    }

    async fn get_instrument_by_name(&self, name: &str) -> Result<Option<Instrument>> {
        let model = Instruments::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err("查询乐器失败"))?;
        Ok(model.map(|m| m.into_instrument()))
    }

    async fn list_instruments(&self) -> Result<Vec<Instrument>> {
        let models = Instruments::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err("查询乐器列表失败"))?;
        Ok(models.into_iter().map(|m| m.into_instrument()).collect())
    }

    async fn count_instrument_usage(&self, id: i64) -> Result<i64> {
        let batches = batches::Entity::find()
            .filter(batches::Column::InstrumentId.eq(id))
            .count(&self.db)
            .await
            .map_err(db_err("统计乐器引用失败"))?;
        let enrollments = enrollments::Entity::find()
            .filter(enrollments::Column::InstrumentId.eq(id))
            .count(&self.db)
            .await
            .map_err(db_err("统计乐器引用失败"))?;
        let packages = packages::Entity::find()
            .filter(packages::Column::InstrumentId.eq(id))
            .count(&self.db)
            .await
            .map_err(db_err("统计乐器引用失败"))?;
        Ok((batches + enrollments + packages) as i64)
    }

    async fn delete_instrument(&self, id: i64) -> Result<bool> {
        let result = Instruments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除乐器失败"))?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_batch, storage};
    use super::*;

    #[tokio::test]
    async fn test_usage_counts_batches() {
        let storage = storage().await;
        let piano = storage.create_instrument("Piano").await.unwrap();
        assert_eq!(storage.count_instrument_usage(piano.id).await.unwrap(), 0);

        let (_, guitar_id, _) = seed_batch(&storage, 4).await;
        assert_eq!(storage.count_instrument_usage(guitar_id).await.unwrap(), 1);

        let names: Vec<String> = storage
            .list_instruments()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Guitar", "Piano"]);
        assert!(storage.delete_instrument(piano.id).await.unwrap());
    }
}
