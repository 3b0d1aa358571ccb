use super::{SeaOrmStorage, db_err};
use crate::errors::Result;
use crate::storage::SystemStorage;
use async_trait::async_trait;

#[async_trait]
impl SystemStorage for SeaOrmStorage {
    async fn ping(&self) -> Result<()> {
        self.db.ping().await.map_err(db_err("数据库连接检查失败"))
    }
}
