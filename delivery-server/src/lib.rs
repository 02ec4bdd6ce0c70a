//! Bento Delivery Server - 外卖平台后端
//!
//! # 架构概述
//!
//! 本模块是 Delivery Server 的主入口，提供以下核心功能：
//!
//! - **持久层** (`db`): 单一 Store 接口，双后端 (SurrealDB / SQLite)
//! - **认证** (`auth`): JWT + Argon2 + 邮箱验证码
//! - **HTTP API** (`api`): RESTful API 接口
//! - **订单跟踪** (`tracking`): 状态机 + 定时推进器
//! - **通知** (`notify`): 事务性邮件 (best-effort)
//!
//! # 模块结构
//!
//! ```text
//! delivery-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── auth/          # JWT 认证、密码、验证码
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 持久层 (store 接口 + 双适配器)
//! ├── notify/        # 邮件通知
//! ├── tracking/      # 订单状态机与推进器
//! └── utils/         # 错误、日志、校验、金额
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod tracking;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use crate::core::{Config, Server, ServerState};
pub use db::StoreBackend;
pub use db::store::{Store, StoreError};
pub use notify::NotificationService;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ____             __
   / __ )___  ____  / /_____
  / __  / _ \/ __ \/ __/ __ \
 / /_/ /  __/ / / / /_/ /_/ /
/_____/\___/_/ /_/\__/\____/
    ____       ___
   / __ \___  / (_)   _____  _______  __
  / / / / _ \/ / / | / / _ \/ ___/ / / /
 / /_/ /  __/ / /| |/ /  __/ /  / /_/ /
/_____/\___/_/_/ |___/\___/_/   \__, /
                               /____/
    "#
    );
}

/// 设置运行环境: dotenv + 工作目录 + 日志
pub fn setup_environment() -> std::io::Result<()> {
    // .env 不存在时静默跳过
    let _ = dotenv::dotenv();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
    std::fs::create_dir_all(&work_dir)?;

    let log_dir = std::path::Path::new(&work_dir).join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.to_str());

    Ok(())
}
