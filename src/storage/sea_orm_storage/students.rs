//! 学生、监护人与学生文档存储操作

use super::{SeaOrmStorage, db_err, normalize_page, now_ts};
use crate::entity::student_documents::{
    ActiveModel as DocumentActiveModel, Column as DocumentColumn, Entity as StudentDocuments,
};
use crate::entity::student_guardians::{
    ActiveModel as GuardianActiveModel, Column as GuardianColumn, Entity as StudentGuardians,
};
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    students::{
        entities::{Guardian, NewStudentDocument, Student, StudentDocument, StudentStatus},
        requests::{
            CreateGuardianRequest, CreateStudentRequest, StudentListQuery, UpdateStudentRequest,
        },
        responses::StudentListResponse,
    },
};
use crate::storage::StudentStorage;
use crate::utils::like_contains;
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde_json::Value;

/// 合并 metadata：对象按键覆盖，值为 null 的键被删除，其余情况整体替换
fn merge_metadata(current: Option<Value>, patch: Value) -> Option<Value> {
    match (current, patch) {
        (Some(Value::Object(mut base)), Value::Object(patch)) => {
            for (key, value) in patch {
                if value.is_null() {
                    base.remove(&key);
                } else {
                    base.insert(key, value);
                }
            }
            Some(Value::Object(base))
        }
        (_, Value::Null) => None,
        (_, patch) => Some(patch),
    }
}

fn encode_metadata(value: Option<Value>) -> Result<Option<String>> {
    value
        .map(|v| serde_json::to_string(&v))
        .transpose()
        .map_err(Into::into)
}

#[async_trait]
impl StudentStorage for SeaOrmStorage {
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student> {
        let now = now_ts();
        let model = ActiveModel {
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            date_of_birth: Set(req.date_of_birth),
            email: Set(req.email),
            phone: Set(req.phone),
            status: Set(req.status.unwrap_or(StudentStatus::Active).to_string()),
            source: Set(req.source),
            metadata: Set(encode_metadata(req.metadata)?),
            notes: Set(req.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("创建学生失败"))?;
        Ok(model.into_student())
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        let model = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询学生失败"))?;
        Ok(model.map(|m| m.into_student()))
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Students::find();
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::FirstName.like(like_contains(pattern)))
                    .add(Column::LastName.like(like_contains(pattern)))
                    .add(Column::Email.like(like_contains(pattern)))
                    .add(Column::Phone.like(like_contains(pattern))),
            );
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_err("查询学生总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_err("查询学生页数失败"))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询学生列表失败"))?;

        Ok(StudentListResponse {
            items: models.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        let Some(existing) = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询学生失败"))?
        else {
            return Ok(None);
        };

        let current_metadata = existing.clone().into_student().metadata;
        let mut model: ActiveModel = existing.into();
        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(date_of_birth) = update.date_of_birth {
            model.date_of_birth = Set(Some(date_of_birth));
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(source) = update.source {
            model.source = Set(Some(source));
        }
        if let Some(patch) = update.metadata {
            model.metadata = Set(encode_metadata(merge_metadata(current_metadata, patch))?);
        }
        if let Some(notes) = update.notes {
            model.notes = Set(Some(notes));
        }
        model.updated_at = Set(now_ts());

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_err("更新学生失败"))?;
        Ok(Some(updated.into_student()))
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        let result = Students::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除学生失败"))?;
        Ok(result.rows_affected > 0)
    }

    async fn create_guardian(&self, student_id: i64, req: CreateGuardianRequest) -> Result<Guardian> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        // 主要监护人只保留一位
        if req.is_primary {
            StudentGuardians::update_many()
                .col_expr(GuardianColumn::IsPrimary, Expr::value(false))
                .filter(GuardianColumn::StudentId.eq(student_id))
                .exec(&txn)
                .await
                .map_err(db_err("更新监护人失败"))?;
        }

        let model = GuardianActiveModel {
            student_id: Set(student_id),
            name: Set(req.name),
            relation: Set(req.relation),
            phone: Set(req.phone),
            email: Set(req.email),
            is_primary: Set(req.is_primary),
            created_at: Set(now_ts()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err("创建监护人失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(model.into_guardian())
    }

    async fn list_guardians(&self, student_id: i64) -> Result<Vec<Guardian>> {
        let models = StudentGuardians::find()
            .filter(GuardianColumn::StudentId.eq(student_id))
            .order_by_desc(GuardianColumn::IsPrimary)
            .order_by_asc(GuardianColumn::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询监护人失败"))?;
        Ok(models.into_iter().map(|m| m.into_guardian()).collect())
    }

    async fn delete_guardian(&self, student_id: i64, guardian_id: i64) -> Result<bool> {
        let result = StudentGuardians::delete_many()
            .filter(GuardianColumn::Id.eq(guardian_id))
            .filter(GuardianColumn::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(db_err("删除监护人失败"))?;
        Ok(result.rows_affected > 0)
    }

    async fn create_document(&self, doc: NewStudentDocument) -> Result<StudentDocument> {
        let model = DocumentActiveModel {
            student_id: Set(doc.student_id),
            doc_type: Set(doc.doc_type),
            file_name: Set(doc.file_name),
            stored_name: Set(doc.stored_name),
            file_size: Set(doc.file_size),
            mime_type: Set(doc.mime_type),
            uploaded_by: Set(doc.uploaded_by),
            created_at: Set(now_ts()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("保存文档记录失败"))?;
        Ok(model.into_document())
    }

    async fn list_documents(&self, student_id: i64) -> Result<Vec<StudentDocument>> {
        let models = StudentDocuments::find()
            .filter(DocumentColumn::StudentId.eq(student_id))
            .order_by_desc(DocumentColumn::CreatedAt)
            .order_by_desc(DocumentColumn::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询学生文档失败"))?;
        Ok(models.into_iter().map(|m| m.into_document()).collect())
    }

    async fn get_document(
        &self,
        student_id: i64,
        document_id: i64,
    ) -> Result<Option<StudentDocument>> {
        let model = StudentDocuments::find()
            .filter(DocumentColumn::Id.eq(document_id))
            .filter(DocumentColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(db_err("查询学生文档失败"))?;
        Ok(model.map(|m| m.into_document()))
    }

    async fn delete_document(&self, student_id: i64, document_id: i64) -> Result<bool> {
        let result = StudentDocuments::delete_many()
            .filter(DocumentColumn::Id.eq(document_id))
            .filter(DocumentColumn::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(db_err("删除学生文档失败"))?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{storage, student_request};
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_metadata() {
        let merged = merge_metadata(
            Some(json!({"credit_adjustment": 2, "instrument_owned": true})),
            json!({"credit_adjustment": -1, "instrument_owned": null}),
        );
        assert_eq!(merged, Some(json!({"credit_adjustment": -1})));
        assert_eq!(merge_metadata(Some(json!({"a": 1})), Value::Null), None);
        assert_eq!(merge_metadata(None, json!({"a": 1})), Some(json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_student_round_trip_with_metadata() {
        let storage = storage().await;
        let mut req = student_request("Meera");
        req.metadata = Some(json!({"credit_adjustment": 3}));
        let created = storage.create_student(req).await.unwrap();
        assert_eq!(created.status, StudentStatus::Active);
        assert_eq!(created.credit_adjustment(), 3);

        let updated = storage
            .update_student(
                created.id,
                UpdateStudentRequest {
                    metadata: Some(json!({"credit_adjustment": -1})),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.credit_adjustment(), -1);

        let found = storage
            .list_students_with_pagination(StudentListQuery {
                page: None,
                size: None,
                status: None,
                search: Some("mee".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(found.pagination.total, 1);
    }

    #[tokio::test]
    async fn test_single_primary_guardian() {
        let storage = storage().await;
        let student = storage
            .create_student(student_request("Kiran"))
            .await
            .unwrap();

        for name in ["Mother", "Father"] {
            storage
                .create_guardian(
                    student.id,
                    CreateGuardianRequest {
                        name: name.to_string(),
                        relation: name.to_lowercase(),
                        phone: None,
                        email: None,
                        is_primary: true,
                    },
                )
                .await
                .unwrap();
        }

        let guardians = storage.list_guardians(student.id).await.unwrap();
        assert_eq!(guardians.len(), 2);
        assert!(guardians[0].is_primary);
        assert_eq!(guardians[0].name, "Father");
        assert!(!guardians[1].is_primary);

        // 监护人必须属于该学生才能删除
        assert!(
            !storage
                .delete_guardian(student.id + 1, guardians[0].id)
                .await
                .unwrap()
        );
        assert!(
            storage
                .delete_guardian(student.id, guardians[0].id)
                .await
                .unwrap()
        );
    }
}
