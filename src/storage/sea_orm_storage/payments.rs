//! 收款存储操作

use chrono::NaiveDate;

use super::{SeaOrmStorage, db_err, normalize_page, now_ts};
use crate::entity::payments::{ActiveModel, Column, Entity as Payments};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    payments::{
        entities::{NewPayment, Payment},
        requests::PaymentListQuery,
        responses::PaymentListResponse,
    },
};
use crate::storage::PaymentStorage;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

#[async_trait]
impl PaymentStorage for SeaOrmStorage {
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment> {
        let model = ActiveModel {
            student_id: Set(payment.student_id),
            enrollment_id: Set(payment.enrollment_id),
            package_id: Set(payment.package_id),
            amount: Set(payment.amount),
            credits: Set(payment.credits),
            method: Set(payment.method.to_string()),
            paid_on: Set(payment.paid_on),
            reference: Set(payment.reference),
            notes: Set(payment.notes),
            recorded_by: Set(payment.recorded_by),
            created_at: Set(now_ts()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("记录收款失败"))?;
        Ok(model.into_payment())
    }

    async fn get_payment_by_id(&self, id: i64) -> Result<Option<Payment>> {
        let model = Payments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询收款失败"))?;
        Ok(model.map(|m| m.into_payment()))
    }

    async fn list_payments_with_pagination(
        &self,
        query: PaymentListQuery,
    ) -> Result<PaymentListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Payments::find();
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(method) = query.method {
            select = select.filter(Column::Method.eq(method.to_string()));
        }
        if let Some(from) = query.from {
            select = select.filter(Column::PaidOn.gte(from));
        }
        if let Some(to) = query.to {
            select = select.filter(Column::PaidOn.lte(to));
        }

        let paginator = select
            .order_by_desc(Column::PaidOn)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_err("查询收款总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_err("查询收款页数失败"))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询收款列表失败"))?;

        Ok(PaymentListResponse {
            items: models.into_iter().map(|m| m.into_payment()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    async fn list_student_payments(&self, student_id: i64) -> Result<Vec<Payment>> {
        let models = Payments::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::PaidOn)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询学生收款失败"))?;
        Ok(models.into_iter().map(|m| m.into_payment()).collect())
    }

    async fn list_payments_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Payment>> {
        let models = Payments::find()
            .filter(Column::PaidOn.between(from, to))
            .order_by_asc(Column::PaidOn)
            .all(&self.db)
            .await
            .map_err(db_err("查询收款失败"))?;
        Ok(models.into_iter().map(|m| m.into_payment()).collect())
    }

    async fn delete_payment(&self, id: i64) -> Result<bool> {
        let result = Payments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除收款失败"))?;
        Ok(result.rows_affected > 0)
    }
}
