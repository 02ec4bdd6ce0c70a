//! Database Module
//!
//! 持久层入口：根据配置选择存储后端并完成初始化。
//!
//! | 后端 | 实现 | 存储 |
//! |------|------|------|
//! | `surreal` | [`surreal::SurrealStore`] | 嵌入式 SurrealDB (RocksDB) |
//! | `sqlite` | [`sqlite::SqliteStore`] | SQLite (WAL, sqlx) |

pub mod sqlite;
pub mod store;
pub mod surreal;

use std::path::Path;
use std::sync::Arc;

use crate::db::sqlite::SqliteStore;
use crate::db::store::{Store, StoreError};
use crate::db::surreal::SurrealStore;

/// Which persistence adapter to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Surreal,
    Sqlite,
}

impl StoreBackend {
    /// Parse the `STORE_BACKEND` env value; anything unknown falls back to
    /// sqlite with a warning.
    pub fn from_env_value(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "surreal" | "surrealdb" => StoreBackend::Surreal,
            "sqlite" | "sql" => StoreBackend::Sqlite,
            other => {
                tracing::warn!(backend = %other, "Unknown STORE_BACKEND, falling back to sqlite");
                StoreBackend::Sqlite
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Surreal => "surreal",
            StoreBackend::Sqlite => "sqlite",
        }
    }
}

/// Open the configured backend under `work_dir/database/`
pub async fn init_store(
    backend: StoreBackend,
    work_dir: &str,
) -> Result<Arc<dyn Store>, StoreError> {
    let db_dir = Path::new(work_dir).join("database");
    std::fs::create_dir_all(&db_dir)
        .map_err(|e| StoreError::Database(format!("Failed to create database dir: {e}")))?;

    match backend {
        StoreBackend::Surreal => {
            let path = db_dir.join("bento.surreal");
            let store = SurrealStore::open(&path.to_string_lossy()).await?;
            tracing::info!(path = %path.display(), "SurrealDB store opened (RocksDB)");
            Ok(Arc::new(store))
        }
        StoreBackend::Sqlite => {
            let path = db_dir.join("bento.db");
            let store = SqliteStore::open(&path.to_string_lossy()).await?;
            tracing::info!(path = %path.display(), "SQLite store opened (WAL)");
            Ok(Arc::new(store))
        }
    }
}
