//! 报名存储操作

use std::collections::HashMap;

use super::batches::seated_statuses;
use super::{SeaOrmStorage, db_err, now_ts};
use crate::entity::enrollment_batches::{
    ActiveModel as LinkActiveModel, Column as LinkColumn, Entity as EnrollmentBatches,
};
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments, Model};
use crate::entity::{batches, enrollment_batches};
use crate::errors::{Result, SchoolError};
use crate::models::enrollments::{
    entities::{Enrollment, EnrollmentStatus},
    requests::{NewEnrollment, UpdateEnrollmentRequest},
};
use crate::storage::EnrollmentStorage;
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 批量附加报名关联的班次 ID
    pub(super) async fn hydrate_enrollments<C: ConnectionTrait>(
        db: &C,
        models: Vec<Model>,
    ) -> Result<Vec<Enrollment>> {
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut links: HashMap<i64, Vec<i64>> = HashMap::new();
        if !ids.is_empty() {
            for row in EnrollmentBatches::find()
                .filter(LinkColumn::EnrollmentId.is_in(ids))
                .order_by_asc(LinkColumn::BatchId)
                .all(db)
                .await
                .map_err(db_err("查询报名班次失败"))?
            {
                links.entry(row.enrollment_id).or_default().push(row.batch_id);
            }
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let batch_ids = links.remove(&m.id).unwrap_or_default();
                m.into_enrollment(batch_ids)
            })
            .collect())
    }

    /// 检查班次在不计入该报名时是否还有空位
    async fn ensure_capacity<C: ConnectionTrait>(
        db: &C,
        enrollment_id: i64,
        batch_id: i64,
    ) -> Result<()> {
        let batch = batches::Entity::find_by_id(batch_id)
            .one(db)
            .await
            .map_err(db_err("查询班次失败"))?
            .ok_or_else(|| SchoolError::not_found(format!("班次不存在: {batch_id}")))?;

        let seated = enrollment_batches::Entity::find()
            .join(
                JoinType::InnerJoin,
                enrollment_batches::Relation::Enrollment.def(),
            )
            .filter(LinkColumn::BatchId.eq(batch_id))
            .filter(LinkColumn::EnrollmentId.ne(enrollment_id))
            .filter(Column::Status.is_in(seated_statuses()))
            .count(db)
            .await
            .map_err(db_err("统计班次人数失败"))?;

        if seated as i64 >= batch.capacity as i64 {
            return Err(SchoolError::conflict(format!(
                "班次已满: {} ({}/{})",
                batch.name, seated, batch.capacity
            )));
        }
        Ok(())
    }

    /// 在事务内写入班次关联，逐个检查容量
    async fn link_batches<C: ConnectionTrait>(
        db: &C,
        enrollment_id: i64,
        batch_ids: &[i64],
    ) -> Result<()> {
        let now = now_ts();
        let mut seen = Vec::with_capacity(batch_ids.len());

        for &batch_id in batch_ids {
            if seen.contains(&batch_id) {
                continue;
            }
            seen.push(batch_id);

            Self::ensure_capacity(db, enrollment_id, batch_id).await?;

            LinkActiveModel {
                enrollment_id: Set(enrollment_id),
                batch_id: Set(batch_id),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await
            .map_err(db_err("写入报名班次失败"))?;
        }
        Ok(())
    }
}

fn is_seated(status: &str) -> bool {
    seated_statuses().iter().any(|s| s.as_str() == status)
}

#[async_trait]
impl EnrollmentStorage for SeaOrmStorage {
    async fn create_enrollment(&self, req: NewEnrollment) -> Result<Enrollment> {
        let now = now_ts();
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let model = ActiveModel {
            student_id: Set(req.student_id),
            instrument_id: Set(req.instrument_id),
            package_id: Set(req.package_id),
            status: Set(EnrollmentStatus::Active.to_string()),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err("创建报名失败"))?;

        // 任一班次满员时整体回滚
        Self::link_batches(&txn, model.id, &req.batch_ids).await?;
        let enrollment = Self::hydrate_enrollments(&txn, vec![model]).await?.pop();

        txn.commit().await.map_err(db_err("提交事务失败"))?;
        enrollment.ok_or_else(|| SchoolError::database_operation("创建报名后读取失败"))
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        let Some(model) = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询报名失败"))?
        else {
            return Ok(None);
        };
        Ok(Self::hydrate_enrollments(&self.db, vec![model]).await?.pop())
    }

    async fn list_student_enrollments(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        let models = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::StartDate)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询学生报名失败"))?;
        Self::hydrate_enrollments(&self.db, models).await
    }

    async fn update_enrollment(
        &self,
        id: i64,
        update: UpdateEnrollmentRequest,
    ) -> Result<Option<Enrollment>> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let Some(existing) = Enrollments::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err("查询报名失败"))?
        else {
            return Ok(None);
        };

        // 从 completed/cancelled 恢复时重新占用名额
        if let Some(status) = update.status
            && !is_seated(&existing.status)
            && is_seated(&status.to_string())
        {
            let links = EnrollmentBatches::find()
                .filter(LinkColumn::EnrollmentId.eq(id))
                .all(&txn)
                .await
                .map_err(db_err("查询报名班次失败"))?;
            for link in links {
                Self::ensure_capacity(&txn, id, link.batch_id).await?;
            }
        }

        let mut model: ActiveModel = existing.into();
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(package_id) = update.package_id {
            model.package_id = Set(Some(package_id));
        }
        if let Some(start_date) = update.start_date {
            model.start_date = Set(start_date);
        }
        if let Some(end_date) = update.end_date {
            model.end_date = Set(Some(end_date));
        }
        model.updated_at = Set(now_ts());

        let updated = model
            .update(&txn)
            .await
            .map_err(db_err("更新报名失败"))?;
        let enrollment = Self::hydrate_enrollments(&txn, vec![updated]).await?.pop();
        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(enrollment)
    }

    async fn replace_enrollment_batches(
        &self,
        id: i64,
        batch_ids: Vec<i64>,
    ) -> Result<Option<Enrollment>> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let Some(model) = Enrollments::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err("查询报名失败"))?
        else {
            return Ok(None);
        };

        EnrollmentBatches::delete_many()
            .filter(LinkColumn::EnrollmentId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err("清理报名班次失败"))?;
        Self::link_batches(&txn, id, &batch_ids).await?;

        Enrollments::update_many()
            .col_expr(Column::UpdatedAt, Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err("更新报名失败"))?;

        let enrollment = Self::hydrate_enrollments(&txn, vec![model]).await?.pop();
        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(enrollment)
    }

    async fn delete_enrollment(&self, id: i64) -> Result<bool> {
        let result = Enrollments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除报名失败"))?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_batch, seed_student, storage};
    use super::*;
    use chrono::NaiveDate;

    fn new_enrollment(student_id: i64, instrument_id: i64, batch_ids: Vec<i64>) -> NewEnrollment {
        NewEnrollment {
            student_id,
            instrument_id,
            package_id: None,
            start_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            end_date: None,
            batch_ids,
        }
    }

    #[tokio::test]
    async fn test_capacity_is_enforced_and_rolled_back() {
        let storage = storage().await;
        let (_, instrument_id, batch_id) = seed_batch(&storage, 1).await;
        let first = seed_student(&storage, "First").await;
        let second = seed_student(&storage, "Second").await;

        storage
            .create_enrollment(new_enrollment(first, instrument_id, vec![batch_id]))
            .await
            .unwrap();

        let err = storage
            .create_enrollment(new_enrollment(second, instrument_id, vec![batch_id]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");

        // 失败的报名不应残留
        assert!(
            storage
                .list_student_enrollments(second)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_replace_batches_keeps_own_seat() {
        let storage = storage().await;
        let (_, instrument_id, batch_id) = seed_batch(&storage, 1).await;
        let (_, _, other_batch) = seed_batch(&storage, 3).await;
        let student = seed_student(&storage, "Solo").await;

        let enrollment = storage
            .create_enrollment(new_enrollment(student, instrument_id, vec![batch_id]))
            .await
            .unwrap();

        // 重新提交同一个满员班次不算超员
        let replaced = storage
            .replace_enrollment_batches(enrollment.id, vec![other_batch, batch_id, batch_id])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.batch_ids, vec![batch_id, other_batch]);

        let missing = storage
            .replace_enrollment_batches(enrollment.id, vec![9999])
            .await
            .unwrap_err();
        assert_eq!(missing.code(), "E008");
        let unchanged = storage
            .get_enrollment_by_id(enrollment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.batch_ids.len(), 2);
    }
}
