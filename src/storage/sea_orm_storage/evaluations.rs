//! 学生评估存储操作

use super::{SeaOrmStorage, db_err, now_ts};
use crate::entity::student_evaluations::{ActiveModel, Column, Entity as StudentEvaluations};
use crate::errors::Result;
use crate::models::evaluations::entities::{NewEvaluation, StudentEvaluation};
use crate::storage::EvaluationStorage;
use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

#[async_trait]
impl EvaluationStorage for SeaOrmStorage {
    async fn create_evaluation(&self, evaluation: NewEvaluation) -> Result<StudentEvaluation> {
        let model = ActiveModel {
            student_id: Set(evaluation.student_id),
            teacher_id: Set(evaluation.teacher_id),
            enrollment_id: Set(evaluation.enrollment_id),
            evaluated_on: Set(evaluation.evaluated_on),
            technique: Set(evaluation.technique),
            theory: Set(evaluation.theory),
            rhythm: Set(evaluation.rhythm),
            performance: Set(evaluation.performance),
            remarks: Set(evaluation.remarks),
            created_at: Set(now_ts()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("保存评估失败"))?;
        Ok(model.into_evaluation())
    }

    async fn list_student_evaluations(&self, student_id: i64) -> Result<Vec<StudentEvaluation>> {
        let models = StudentEvaluations::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::EvaluatedOn)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询学生评估失败"))?;
        Ok(models.into_iter().map(|m| m.into_evaluation()).collect())
    }

    async fn list_teacher_evaluations(
        &self,
        teacher_id: i64,
        limit: u64,
    ) -> Result<Vec<StudentEvaluation>> {
        let models = StudentEvaluations::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_desc(Column::EvaluatedOn)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err("查询教师评估失败"))?;
        Ok(models.into_iter().map(|m| m.into_evaluation()).collect())
    }
}
