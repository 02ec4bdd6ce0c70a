use crate::auth::JwtConfig;
use crate::db::StoreBackend;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | STORE_BACKEND | sqlite | 存储后端: sqlite \| surreal |
/// | ADMIN_EMAIL | admin@bento.dev | 管理员邮箱 (权限按邮箱相等判定) |
/// | SCAN_INTERVAL_SECS | 45 | 订单状态扫描周期 (秒, ≤60) |
/// | MAIL_API_URL | (未设置) | 邮件 API 地址，未设置时仅记日志 |
/// | MAIL_API_KEY | (未设置) | 邮件 API bearer key |
/// | MAIL_FROM | no-reply@bento.dev | 发件人地址 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/bento STORE_BACKEND=surreal cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库与日志文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 存储后端
    pub store_backend: StoreBackend,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 管理员邮箱
    pub admin_email: String,
    /// 订单状态扫描周期 (秒)
    pub scan_interval_secs: u64,
    /// 邮件 API 地址
    pub mail_api_url: Option<String>,
    /// 邮件 API key
    pub mail_api_key: Option<String>,
    /// 发件人地址
    pub mail_from: String,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        // 任何 >60s 的扫描周期都会放大状态推进的可见延迟，上限卡死
        let scan_interval_secs = std::env::var("SCAN_INTERVAL_SECS")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(45)
            .clamp(1, 60);

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            store_backend: StoreBackend::from_env_value(
                &std::env::var("STORE_BACKEND").unwrap_or_else(|_| "sqlite".into()),
            ),
            jwt: JwtConfig::default(),
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@bento.dev".into()),
            scan_interval_secs,
            mail_api_url: std::env::var("MAIL_API_URL").ok(),
            mail_api_key: std::env::var("MAIL_API_KEY").ok(),
            mail_from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "no-reply@bento.dev".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(
        work_dir: impl Into<String>,
        http_port: u16,
        store_backend: StoreBackend,
    ) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.store_backend = store_backend;
        config
    }

    /// 管理权限：邮箱相等判定 (大小写不敏感)
    pub fn is_admin(&self, email: &str) -> bool {
        email.eq_ignore_ascii_case(&self.admin_email)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_check_is_case_insensitive() {
        let mut config = Config::with_overrides("/tmp/x", 0, StoreBackend::Sqlite);
        config.admin_email = "admin@bento.dev".to_string();
        assert!(config.is_admin("Admin@Bento.Dev"));
        assert!(!config.is_admin("user@bento.dev"));
    }
}
