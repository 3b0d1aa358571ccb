//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 各领域的 trait 实现分布在同名子模块中。

mod attendance;
mod auth;
mod batches;
mod enrollments;
mod evaluations;
mod finance;
mod instruments;
mod notifications;
mod packages;
mod payments;
mod prospects;
mod students;
mod system;
mod teachers;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

/// 把数据库错误包装为带上下文的业务错误
pub(crate) fn db_err(action: &'static str) -> impl Fn(DbErr) -> SchoolError {
    move |e| SchoolError::database_operation(format!("{action}: {e}"))
}

/// 当前 Unix 秒
pub(crate) fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config.database.pool_size, config.database.timeout)
                .await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::migrate(&db).await?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 单连接的内存 SQLite，测试与一次性命令使用
    pub async fn new_in_memory() -> Result<Self> {
        let db = Self::connect_sqlite("sqlite::memory:", 1, 5).await?;
        Self::migrate(&db).await?;
        Ok(Self { db })
    }

    /// 运行全部待执行的迁移
    pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None)
            .await
            .map_err(|e| SchoolError::database_operation(format!("数据库迁移失败: {e}")))
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(
        url: &str,
        max_connections: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");
        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        // 内存库不支持 WAL
        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        let mut pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout_secs));

        // 内存库随最后一个连接关闭而消失，连接不能被回收
        pool = if in_memory {
            pool.idle_timeout(None).max_lifetime(None)
        } else {
            pool.idle_timeout(Duration::from_secs(300))
        };

        let pool = pool
            .connect_with(opt)
            .await
            .map_err(|e| SchoolError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 分页参数归一化：页码从 1 开始，每页 1..=100 条
pub(crate) fn normalize_page(page: Option<i64>, size: Option<i64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1) as u64;
    let size = size.unwrap_or(10).clamp(1, 100) as u64;
    (page, size)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::models::{
        batches::requests::CreateBatchRequest,
        students::requests::CreateStudentRequest,
        teachers::{entities::PayoutType, requests::CreateTeacherRequest},
    };
    use crate::storage::{BatchStorage, InstrumentStorage, StudentStorage, TeacherStorage};

    pub async fn storage() -> SeaOrmStorage {
        SeaOrmStorage::new_in_memory()
            .await
            .expect("in-memory storage")
    }

    pub fn student_request(first_name: &str) -> CreateStudentRequest {
        CreateStudentRequest {
            first_name: first_name.to_string(),
            last_name: "Test".to_string(),
            date_of_birth: None,
            email: None,
            phone: None,
            status: None,
            source: None,
            metadata: None,
            notes: None,
        }
    }

    /// 建好一位按课时结算的教师、一个乐器和一个周一周三的班次
    pub async fn seed_batch(storage: &SeaOrmStorage, capacity: i32) -> (i64, i64, i64) {
        let teacher = storage
            .create_teacher(CreateTeacherRequest {
                name: "Ravi".to_string(),
                email: None,
                phone: None,
                payout_type: PayoutType::PerClass,
                rate: 500,
                joined_on: None,
                notes: None,
            })
            .await
            .unwrap();
        let instrument = match storage.get_instrument_by_name("Guitar").await.unwrap() {
            Some(instrument) => instrument,
            None => storage.create_instrument("Guitar").await.unwrap(),
        };
        let batch = storage
            .create_batch(CreateBatchRequest {
                name: "Guitar Beginners".to_string(),
                instrument_id: instrument.id,
                teacher_id: teacher.id,
                recurrence: "MON,WED 17:00-18:00".to_string(),
                capacity,
            })
            .await
            .unwrap();
        (teacher.id, instrument.id, batch.id)
    }

    pub async fn seed_student(storage: &SeaOrmStorage, name: &str) -> i64 {
        storage
            .create_student(student_request(name))
            .await
            .unwrap()
            .id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("school.db").unwrap(),
            "sqlite://school.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u@h/db").is_ok());
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }

    #[test]
    fn test_normalize_page() {
        assert_eq!(normalize_page(None, None), (1, 10));
        assert_eq!(normalize_page(Some(0), Some(1000)), (1, 100));
        assert_eq!(normalize_page(Some(3), Some(0)), (3, 1));
    }
}
