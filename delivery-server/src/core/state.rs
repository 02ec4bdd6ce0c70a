use std::sync::Arc;
use std::time::Duration;

use crate::auth::JwtService;
use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::db::store::Store;
use crate::notify::NotificationService;
use crate::tracking::progressor::OrderProgressor;

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是服务器的核心数据结构，使用 Arc 实现浅拷贝，
/// clone 成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Arc<dyn Store> | 持久层 (启动时选定后端) |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | notifications | NotificationService | 通知服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 持久层
    pub store: Arc<dyn Store>,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
    /// 通知服务
    pub notifications: NotificationService,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替；测试场景用这里注入
    /// 内存后端和可断言的邮件通道。
    pub fn new(
        config: Config,
        store: Arc<dyn Store>,
        jwt_service: Arc<JwtService>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            config,
            store,
            jwt_service,
            notifications,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 持久层 (work_dir/database/)
    /// 3. JWT 服务、通知服务
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;

        let store = crate::db::init_store(config.store_backend, &config.work_dir)
            .await
            .map_err(|e| anyhow::anyhow!("Store initialization failed: {e}"))?;

        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        let notifications = NotificationService::from_config(
            config.mail_api_url.as_deref(),
            config.mail_api_key.as_deref(),
            &config.mail_from,
        );

        Ok(Self::new(config.clone(), store, jwt_service, notifications))
    }

    /// 启动后台任务
    ///
    /// 目前只有一个：订单状态推进器 (Periodic)。
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let progressor = OrderProgressor::new(
            self.store.clone(),
            self.notifications.clone(),
            Duration::from_secs(self.config.scan_interval_secs),
            tasks.shutdown_token(),
        );
        tasks.spawn("order_progressor", TaskKind::Periodic, progressor.run());

        tracing::info!(
            "Background tasks registered: {} total",
            tasks.len()
        );
        tasks
    }

    /// 获取持久层
    pub fn store(&self) -> Arc<dyn Store> {
        self.store.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
