//! 潜在学员跟进记录存储操作

use super::{SeaOrmStorage, db_err, now_ts};
use crate::entity::prospect_notes::{ActiveModel, Column, Entity as ProspectNotes};
use crate::errors::Result;
use crate::models::prospects::{entities::ProspectNote, requests::CreateProspectNoteRequest};
use crate::storage::ProspectStorage;
use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[async_trait]
impl ProspectStorage for SeaOrmStorage {
    async fn create_prospect_note(
        &self,
        student_id: i64,
        author_id: i64,
        req: CreateProspectNoteRequest,
    ) -> Result<ProspectNote> {
        let model = ActiveModel {
            student_id: Set(student_id),
            author_id: Set(author_id),
            note: Set(req.note),
            follow_up_on: Set(req.follow_up_on),
            created_at: Set(now_ts()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("保存跟进记录失败"))?;
        Ok(model.into_note())
    }

    async fn list_prospect_notes(&self, student_id: i64) -> Result<Vec<ProspectNote>> {
        let models = ProspectNotes::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询跟进记录失败"))?;
        Ok(models.into_iter().map(|m| m.into_note()).collect())
    }
}
