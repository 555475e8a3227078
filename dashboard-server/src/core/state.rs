use std::path::Path;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

/// 服务器状态 - 所有处理器共享
///
/// Clone 开销很小: 配置在 `Arc` 中, 连接池本身是引用计数的。
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: DbService,
}

impl ServerState {
    pub fn new(config: Config, db: DbService) -> Self {
        Self {
            config: Arc::new(config),
            db,
        }
    }

    /// 打开数据库并执行迁移
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = if config.is_in_memory() {
            DbService::in_memory().await?
        } else {
            // 确保数据目录存在
            if let Some(parent) = Path::new(&config.database_path).parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::database(format!("Failed to create data directory: {e}"))
                })?;
            }
            DbService::new(&config.database_path).await?
        };
        Ok(Self::new(config.clone(), db))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}
