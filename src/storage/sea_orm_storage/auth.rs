//! 刷新令牌存储操作

use super::{SeaOrmStorage, db_err, now_ts};
use crate::entity::refresh_tokens::{ActiveModel, Column, Entity as RefreshTokens};
use crate::errors::Result;
use crate::models::auth::entities::RefreshToken;
use crate::storage::AuthStorage;
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set, TransactionTrait,
};

#[async_trait]
impl AuthStorage for SeaOrmStorage {
    async fn create_refresh_token(
        &self,
        user_id: i64,
        token_hash: &str,
        expires_at: i64,
        user_agent: Option<String>,
    ) -> Result<RefreshToken> {
        let model = ActiveModel {
            user_id: Set(user_id),
            token_hash: Set(token_hash.to_string()),
            expires_at: Set(expires_at),
            revoked_at: Set(None),
            replaced_by: Set(None),
            user_agent: Set(user_agent),
            created_at: Set(now_ts()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("写入刷新令牌失败"))?;

        Ok(model.into_refresh_token())
    }

    async fn get_refresh_token_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>> {
        let model = RefreshTokens::find()
            .filter(Column::TokenHash.eq(token_hash))
            .one(&self.db)
            .await
            .map_err(db_err("查询刷新令牌失败"))?;
        Ok(model.map(|m| m.into_refresh_token()))
    }

    async fn rotate_refresh_token(
        &self,
        old: &RefreshToken,
        new_hash: &str,
        expires_at: i64,
        user_agent: Option<String>,
    ) -> Result<Option<RefreshToken>> {
        let now = now_ts();
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let new_token = ActiveModel {
            user_id: Set(old.user_id),
            token_hash: Set(new_hash.to_string()),
            expires_at: Set(expires_at),
            revoked_at: Set(None),
            replaced_by: Set(None),
            user_agent: Set(user_agent),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err("写入刷新令牌失败"))?;

        // 只吊销仍然有效的旧令牌，并发请求中只有一个能成功
        let result = RefreshTokens::update_many()
            .col_expr(Column::RevokedAt, Expr::value(now))
            .col_expr(Column::ReplacedBy, Expr::value(new_token.id))
            .filter(Column::Id.eq(old.id))
            .filter(Column::RevokedAt.is_null())
            .exec(&txn)
            .await
            .map_err(db_err("吊销刷新令牌失败"))?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(db_err("回滚事务失败"))?;
            return Ok(None);
        }

        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(Some(new_token.into_refresh_token()))
    }

    async fn revoke_refresh_token(&self, id: i64) -> Result<bool> {
        let result = RefreshTokens::update_many()
            .col_expr(Column::RevokedAt, Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .filter(Column::RevokedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err("吊销刷新令牌失败"))?;
        Ok(result.rows_affected > 0)
    }

    async fn revoke_all_user_tokens(&self, user_id: i64) -> Result<u64> {
        let result = RefreshTokens::update_many()
            .col_expr(Column::RevokedAt, Expr::value(now_ts()))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::RevokedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err("吊销用户令牌失败"))?;
        Ok(result.rows_affected)
    }

    async fn cleanup_refresh_tokens(&self, now: i64) -> Result<u64> {
        let result = RefreshTokens::delete_many()
            .filter(
                Condition::any()
                    .add(Column::ExpiresAt.lte(now))
                    .add(Column::RevokedAt.is_not_null()),
            )
            .exec(&self.db)
            .await
            .map_err(db_err("清理刷新令牌失败"))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::storage;
    use super::*;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::UserStorage;

    async fn user_id(storage: &SeaOrmStorage) -> i64 {
        storage
            .create_user(CreateUserRequest {
                email: "t@school.test".to_string(),
                password: None,
                display_name: "T".to_string(),
                avatar_url: None,
                roles: vec![],
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_rotation_revokes_old_token() {
        let storage = storage().await;
        let user_id = user_id(&storage).await;
        let expires = now_ts() + 3600;

        let first = storage
            .create_refresh_token(user_id, "hash-1", expires, None)
            .await
            .unwrap();
        let second = storage
            .rotate_refresh_token(&first, "hash-2", expires, None)
            .await
            .unwrap()
            .expect("rotation succeeds once");

        let old = storage
            .get_refresh_token_by_hash("hash-1")
            .await
            .unwrap()
            .unwrap();
        assert!(old.is_revoked());
        assert_eq!(old.replaced_by, Some(second.id));

        // 旧令牌再次轮换失败，且不会留下新令牌
        let again = storage
            .rotate_refresh_token(&first, "hash-3", expires, None)
            .await
            .unwrap();
        assert!(again.is_none());
        assert!(
            storage
                .get_refresh_token_by_hash("hash-3")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_revoke_all_and_cleanup() {
        let storage = storage().await;
        let user_id = user_id(&storage).await;
        let now = now_ts();

        storage
            .create_refresh_token(user_id, "a", now + 100, None)
            .await
            .unwrap();
        storage
            .create_refresh_token(user_id, "b", now + 100, None)
            .await
            .unwrap();
        storage
            .create_refresh_token(user_id, "expired", now - 1, None)
            .await
            .unwrap();

        assert_eq!(storage.revoke_all_user_tokens(user_id).await.unwrap(), 3);
        assert_eq!(storage.cleanup_refresh_tokens(now).await.unwrap(), 3);
    }
}
