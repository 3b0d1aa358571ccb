//! 班次存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, db_err, normalize_page, now_ts};
use crate::entity::batches::{ActiveModel, Column, Entity as Batches};
use crate::entity::{enrollment_batches, enrollments, students};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    batches::{
        entities::{Batch, BatchStatus},
        requests::{BatchListQuery, CreateBatchRequest, UpdateBatchRequest},
        responses::BatchListResponse,
    },
    enrollments::entities::{Enrollment, EnrollmentStatus},
    students::entities::Student,
};
use crate::storage::BatchStorage;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

/// 仍占用班次名额的报名状态
pub(super) fn seated_statuses() -> Vec<String> {
    vec![
        EnrollmentStatus::Active.to_string(),
        EnrollmentStatus::Paused.to_string(),
    ]
}

#[async_trait]
impl BatchStorage for SeaOrmStorage {
    async fn create_batch(&self, req: CreateBatchRequest) -> Result<Batch> {
        let now = now_ts();
        let model = ActiveModel {
            name: Set(req.name),
            instrument_id: Set(req.instrument_id),
            teacher_id: Set(req.teacher_id),
            recurrence: Set(req.recurrence),
            capacity: Set(req.capacity),
            status: Set(BatchStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("创建班次失败"))?;
        Ok(model.into_batch())
    }

    async fn get_batch_by_id(&self, id: i64) -> Result<Option<Batch>> {
        let model = Batches::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询班次失败"))?;
        Ok(model.map(|m| m.into_batch()))
    }

    async fn get_batches_by_ids(&self, ids: &[i64]) -> Result<Vec<Batch>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = Batches::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询班次失败"))?;
        Ok(models.into_iter().map(|m| m.into_batch()).collect())
    }

    async fn list_batches_with_pagination(
        &self,
        query: BatchListQuery,
    ) -> Result<BatchListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Batches::find();
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(instrument_id) = query.instrument_id {
            select = select.filter(Column::InstrumentId.eq(instrument_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_err("查询班次总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_err("查询班次页数失败"))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询班次列表失败"))?;

        Ok(BatchListResponse {
            items: models.into_iter().map(|m| m.into_batch()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    async fn list_teacher_batches(&self, teacher_id: i64, active_only: bool) -> Result<Vec<Batch>> {
        let mut select = Batches::find().filter(Column::TeacherId.eq(teacher_id));
        if active_only {
            select = select.filter(Column::Status.eq(BatchStatus::Active.to_string()));
        }
        let models = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询教师班次失败"))?;
        Ok(models.into_iter().map(|m| m.into_batch()).collect())
    }

    async fn update_batch(&self, id: i64, update: UpdateBatchRequest) -> Result<Option<Batch>> {
        let Some(existing) = Batches::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询班次失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(instrument_id) = update.instrument_id {
            model.instrument_id = Set(instrument_id);
        }
        if let Some(teacher_id) = update.teacher_id {
            model.teacher_id = Set(teacher_id);
        }
        if let Some(recurrence) = update.recurrence {
            model.recurrence = Set(recurrence);
        }
        if let Some(capacity) = update.capacity {
            model.capacity = Set(capacity);
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        model.updated_at = Set(now_ts());

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_err("更新班次失败"))?;
        Ok(Some(updated.into_batch()))
    }

    async fn delete_batch(&self, id: i64) -> Result<bool> {
        let result = Batches::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除班次失败"))?;
        Ok(result.rows_affected > 0)
    }

    async fn list_batch_roster(&self, batch_id: i64) -> Result<Vec<(Enrollment, Student)>> {
        let enrollment_models = enrollments::Entity::find()
            .join(
                JoinType::InnerJoin,
                enrollments::Relation::EnrollmentBatches.def(),
            )
            .filter(enrollment_batches::Column::BatchId.eq(batch_id))
            .filter(enrollments::Column::Status.is_in(seated_statuses()))
            .order_by_asc(enrollments::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询班次报名失败"))?;

        let student_ids: Vec<i64> = enrollment_models.iter().map(|e| e.student_id).collect();
        let students: HashMap<i64, Student> = if student_ids.is_empty() {
            HashMap::new()
        } else {
            students::Entity::find()
                .filter(students::Column::Id.is_in(student_ids))
                .all(&self.db)
                .await
                .map_err(db_err("查询班次学生失败"))?
                .into_iter()
                .map(|m| (m.id, m.into_student()))
                .collect()
        };

        let enrollments = Self::hydrate_enrollments(&self.db, enrollment_models).await?;
        let mut roster = Vec::with_capacity(enrollments.len());
        for enrollment in enrollments {
            let student = match students.get(&enrollment.student_id) {
                Some(s) => s.clone(),
                None => continue,
            };
            roster.push((enrollment, student));
        }

        roster.sort_by(|(_, a), (_, b)| {
            a.first_name
                .cmp(&b.first_name)
                .then_with(|| a.last_name.cmp(&b.last_name))
        });
        Ok(roster)
    }

    async fn count_batch_active_enrollments(&self, batch_id: i64) -> Result<i64> {
        let count = enrollment_batches::Entity::find()
            .join(
                JoinType::InnerJoin,
                enrollment_batches::Relation::Enrollment.def(),
            )
            .filter(enrollment_batches::Column::BatchId.eq(batch_id))
            .filter(enrollments::Column::Status.is_in(seated_statuses()))
            .count(&self.db)
            .await
            .map_err(db_err("统计班次人数失败"))?;
        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_batch, seed_student, storage};
    use super::*;
    use crate::models::enrollments::requests::NewEnrollment;
    use crate::storage::EnrollmentStorage;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_roster_lists_enrolled_students() {
        let storage = storage().await;
        let (teacher_id, instrument_id, batch_id) = seed_batch(&storage, 5).await;
        let zed = seed_student(&storage, "Zed").await;
        let amy = seed_student(&storage, "Amy").await;

        for student_id in [zed, amy] {
            storage
                .create_enrollment(NewEnrollment {
                    student_id,
                    instrument_id,
                    package_id: None,
                    start_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
                    end_date: None,
                    batch_ids: vec![batch_id],
                })
                .await
                .unwrap();
        }

        let roster = storage.list_batch_roster(batch_id).await.unwrap();
        let names: Vec<&str> = roster.iter().map(|(_, s)| s.first_name.as_str()).collect();
        assert_eq!(names, vec!["Amy", "Zed"]);
        assert_eq!(roster[0].0.batch_ids, vec![batch_id]);
        assert_eq!(
            storage.count_batch_active_enrollments(batch_id).await.unwrap(),
            2
        );
        assert_eq!(
            storage
                .list_teacher_batches(teacher_id, true)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
