//! 课包存储操作

use super::{SeaOrmStorage, db_err, now_ts};
use crate::entity::packages::{ActiveModel, Column, Entity as Packages};
use crate::errors::Result;
use crate::models::packages::{
    entities::Package,
    requests::{CreatePackageRequest, UpdatePackageRequest},
};
use crate::storage::PackageStorage;
use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[async_trait]
impl PackageStorage for SeaOrmStorage {
    async fn create_package(&self, req: CreatePackageRequest) -> Result<Package> {
        let now = now_ts();
        let model = ActiveModel {
            name: Set(req.name),
            instrument_id: Set(req.instrument_id),
            classes_count: Set(req.classes_count),
            price: Set(req.price),
            validity_days: Set(req.validity_days),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("创建课包失败"))?;
        Ok(model.into_package())
    }

    async fn get_package_by_id(&self, id: i64) -> Result<Option<Package>> {
        let model = Packages::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询课包失败"))?;
        Ok(model.map(|m| m.into_package()))
    }

    async fn get_package_by_name(&self, name: &str) -> Result<Option<Package>> {
        let model = Packages::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err("查询课包失败"))?;
        Ok(model.map(|m| m.into_package()))
    }

    async fn list_packages(&self, active_only: bool) -> Result<Vec<Package>> {
        let mut select = Packages::find();
        if active_only {
            select = select.filter(Column::IsActive.eq(true));
        }
        let models = select
            .order_by_asc(Column::Price)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询课包列表失败"))?;
        Ok(models.into_iter().map(|m| m.into_package()).collect())
    }

    async fn update_package(
        &self,
        id: i64,
        update: UpdatePackageRequest,
    ) -> Result<Option<Package>> {
        let Some(existing) = Packages::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询课包失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(instrument_id) = update.instrument_id {
            model.instrument_id = Set(Some(instrument_id));
        }
        if let Some(classes_count) = update.classes_count {
            model.classes_count = Set(classes_count);
        }
        if let Some(price) = update.price {
            model.price = Set(price);
        }
        if let Some(validity_days) = update.validity_days {
            model.validity_days = Set(validity_days);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(now_ts());

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_err("更新课包失败"))?;
        Ok(Some(updated.into_package()))
    }

    async fn delete_package(&self, id: i64) -> Result<bool> {
        let result = Packages::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除课包失败"))?;
        Ok(result.rows_affected > 0)
    }
}
