//! 支出、预算与教师结算存储操作

use chrono::NaiveDate;

use super::{SeaOrmStorage, db_err, normalize_page, now_ts};
use crate::entity::expenses::{
    ActiveModel as ExpenseActiveModel, Column as ExpenseColumn, Entity as Expenses,
};
use crate::entity::monthly_budgets::{
    ActiveModel as BudgetActiveModel, Column as BudgetColumn, Entity as MonthlyBudgets,
};
use crate::entity::teacher_payouts::{
    ActiveModel as PayoutActiveModel, Column as PayoutColumn, Entity as TeacherPayouts,
};
use crate::errors::{Result, SchoolError};
use crate::models::{
    PaginationInfo,
    finance::{
        entities::{Expense, MonthlyBudget},
        requests::{CreateExpenseRequest, ExpenseListQuery},
        responses::ExpenseListResponse,
    },
    teachers::entities::{PayoutStatus, TeacherPayout},
};
use crate::storage::FinanceStorage;
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

#[async_trait]
impl FinanceStorage for SeaOrmStorage {
    async fn create_expense(&self, req: CreateExpenseRequest, recorded_by: i64) -> Result<Expense> {
        let spent_on = req
            .spent_on
            .unwrap_or_else(|| chrono::Utc::now().date_naive());
        let model = ExpenseActiveModel {
            category: Set(req.category),
            amount: Set(req.amount),
            spent_on: Set(spent_on),
            description: Set(req.description),
            recorded_by: Set(recorded_by),
            created_at: Set(now_ts()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("记录支出失败"))?;
        Ok(model.into_expense())
    }

    async fn list_expenses_with_pagination(
        &self,
        query: ExpenseListQuery,
    ) -> Result<ExpenseListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Expenses::find();
        if let Some((from, to)) = query.range {
            select = select.filter(ExpenseColumn::SpentOn.between(from, to));
        }
        if let Some(ref category) = query.category
            && !category.trim().is_empty()
        {
            select = select.filter(ExpenseColumn::Category.eq(category.trim()));
        }

        let paginator = select
            .order_by_desc(ExpenseColumn::SpentOn)
            .order_by_desc(ExpenseColumn::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_err("查询支出总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_err("查询支出页数失败"))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询支出列表失败"))?;

        Ok(ExpenseListResponse {
            items: models.into_iter().map(|m| m.into_expense()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    async fn list_expenses_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Expense>> {
        let models = Expenses::find()
            .filter(ExpenseColumn::SpentOn.between(from, to))
            .order_by_asc(ExpenseColumn::SpentOn)
            .all(&self.db)
            .await
            .map_err(db_err("查询支出失败"))?;
        Ok(models.into_iter().map(|m| m.into_expense()).collect())
    }

    async fn delete_expense(&self, id: i64) -> Result<bool> {
        let result = Expenses::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除支出失败"))?;
        Ok(result.rows_affected > 0)
    }

    async fn upsert_budget(&self, month: &str, category: &str, amount: i64) -> Result<MonthlyBudget> {
        let now = now_ts();
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let existing = MonthlyBudgets::find()
            .filter(BudgetColumn::Month.eq(month))
            .filter(BudgetColumn::Category.eq(category))
            .one(&txn)
            .await
            .map_err(db_err("查询预算失败"))?;

        let saved = match existing {
            Some(row) => {
                let mut model: BudgetActiveModel = row.into();
                model.amount = Set(amount);
                model.updated_at = Set(now);
                model.update(&txn).await
            }
            None => {
                BudgetActiveModel {
                    month: Set(month.to_string()),
                    category: Set(category.to_string()),
                    amount: Set(amount),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
            }
        }
        .map_err(db_err("保存预算失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(saved.into_budget())
    }

    async fn list_budgets(&self, month: &str) -> Result<Vec<MonthlyBudget>> {
        let models = MonthlyBudgets::find()
            .filter(BudgetColumn::Month.eq(month))
            .order_by_asc(BudgetColumn::Category)
            .all(&self.db)
            .await
            .map_err(db_err("查询预算失败"))?;
        Ok(models.into_iter().map(|m| m.into_budget()).collect())
    }

    async fn list_payouts(
        &self,
        teacher_id: Option<i64>,
        period: Option<&str>,
    ) -> Result<Vec<TeacherPayout>> {
        let mut select = TeacherPayouts::find();
        if let Some(teacher_id) = teacher_id {
            select = select.filter(PayoutColumn::TeacherId.eq(teacher_id));
        }
        if let Some(period) = period {
            select = select.filter(PayoutColumn::Period.eq(period));
        }
        let models = select
            .order_by_desc(PayoutColumn::Period)
            .order_by_asc(PayoutColumn::TeacherId)
            .all(&self.db)
            .await
            .map_err(db_err("查询教师结算失败"))?;
        Ok(models.into_iter().map(|m| m.into_payout()).collect())
    }

    async fn get_payout_by_id(&self, id: i64) -> Result<Option<TeacherPayout>> {
        let model = TeacherPayouts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询教师结算失败"))?;
        Ok(model.map(|m| m.into_payout()))
    }

    async fn create_payout_if_absent(
        &self,
        teacher_id: i64,
        period: &str,
        sessions: i32,
        amount: i64,
    ) -> Result<Option<TeacherPayout>> {
        let now = now_ts();
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let exists = TeacherPayouts::find()
            .filter(PayoutColumn::TeacherId.eq(teacher_id))
            .filter(PayoutColumn::Period.eq(period))
            .count(&txn)
            .await
            .map_err(db_err("查询教师结算失败"))?
            > 0;
        if exists {
            return Ok(None);
        }

        let model = PayoutActiveModel {
            teacher_id: Set(teacher_id),
            period: Set(period.to_string()),
            sessions: Set(sessions),
            amount: Set(amount),
            status: Set(PayoutStatus::Pending.to_string()),
            paid_on: Set(None),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err("生成教师结算失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(Some(model.into_payout()))
    }

    async fn mark_payout_paid(
        &self,
        id: i64,
        paid_on: NaiveDate,
        notes: Option<String>,
    ) -> Result<Option<TeacherPayout>> {
        // 只更新仍为 pending 的记录，并发请求中只有一个能成功
        let mut update = TeacherPayouts::update_many()
            .col_expr(PayoutColumn::Status, Expr::value(PayoutStatus::Paid.to_string()))
            .col_expr(PayoutColumn::PaidOn, Expr::value(paid_on))
            .col_expr(PayoutColumn::UpdatedAt, Expr::value(now_ts()));
        if let Some(notes) = notes {
            update = update.col_expr(PayoutColumn::Notes, Expr::value(notes));
        }
        let result = update
            .filter(PayoutColumn::Id.eq(id))
            .filter(PayoutColumn::Status.eq(PayoutStatus::Pending.to_string()))
            .exec(&self.db)
            .await
            .map_err(db_err("更新教师结算失败"))?;

        match self.get_payout_by_id(id).await? {
            None => Ok(None),
            Some(_) if result.rows_affected == 0 => Err(SchoolError::conflict(format!(
                "Payout {id} has already been paid"
            ))),
            payout => Ok(payout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_batch, storage};
    use super::*;

    #[tokio::test]
    async fn test_budget_upsert_replaces_amount() {
        let storage = storage().await;
        storage.upsert_budget("2024-09", "rent", 1000).await.unwrap();
        let updated = storage.upsert_budget("2024-09", "rent", 1500).await.unwrap();
        assert_eq!(updated.amount, 1500);

        let budgets = storage.list_budgets("2024-09").await.unwrap();
        assert_eq!(budgets.len(), 1);
        assert!(storage.list_budgets("2024-10").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_payout_generation_is_idempotent() {
        let storage = storage().await;
        let (teacher_id, _, _) = seed_batch(&storage, 5).await;

        let created = storage
            .create_payout_if_absent(teacher_id, "2024-09", 8, 4000)
            .await
            .unwrap();
        assert!(created.is_some());
        let again = storage
            .create_payout_if_absent(teacher_id, "2024-09", 9, 4500)
            .await
            .unwrap();
        assert!(again.is_none());

        let payouts = storage
            .list_payouts(Some(teacher_id), Some("2024-09"))
            .await
            .unwrap();
        assert_eq!(payouts.len(), 1);
        assert_eq!(payouts[0].amount, 4000);

        let paid = storage
            .mark_payout_paid(
                payouts[0].id,
                NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
                Some("bank".to_string()),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(paid.status, PayoutStatus::Paid);
        assert_eq!(paid.notes.as_deref(), Some("bank"));

        // 第二次标记不会覆盖已记录的付款日期
        let again = storage
            .mark_payout_paid(
                payouts[0].id,
                NaiveDate::from_ymd_opt(2024, 10, 5).unwrap(),
                None,
            )
            .await;
        assert!(matches!(again, Err(SchoolError::Conflict(_))));
        let stored = storage.get_payout_by_id(payouts[0].id).await.unwrap().unwrap();
        assert_eq!(stored.paid_on, NaiveDate::from_ymd_opt(2024, 10, 1));

        let missing = storage
            .mark_payout_paid(
                payouts[0].id + 100,
                NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
                None,
            )
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
