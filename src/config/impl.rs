use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// 内置默认值，保证没有配置文件时也能启动
    fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_default("app.system_name", "Music School Admin")?
            .set_default("app.environment", "development")?
            .set_default("app.log_level", "info")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.unix_socket_path", "")?
            .set_default("server.workers", 0)?
            .set_default("server.max_workers", 8)?
            .set_default("server.timeouts.client_request", 5000)?
            .set_default("server.timeouts.client_disconnect", 1000)?
            .set_default("server.timeouts.keep_alive", 30)?
            .set_default("server.limits.max_payload_size", 1_048_576)?
            .set_default("jwt.secret", "change-me-in-production")?
            .set_default("jwt.access_token_expiry", 15)?
            .set_default("jwt.refresh_token_expiry", 14)?
            .set_default("database.url", "music_school.db")?
            .set_default("database.pool_size", 10)?
            .set_default("database.timeout", 10)?
            .set_default("cache.type", "moka")?
            .set_default("cache.default_ttl", 300)?
            .set_default("cache.memory.max_capacity", 10_000)?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            .set_default("cors.max_age", 3600)?
            .set_default("upload.dir", "uploads")?
            .set_default("upload.max_size", 10_485_760)?
            .set_default(
                "upload.allowed_types",
                vec![".pdf", ".png", ".jpg", ".jpeg", ".docx"],
            )?
            .set_default("argon2.memory_cost", 19_456)?
            .set_default("argon2.time_cost", 2)?
            .set_default("argon2.parallelism", 1)?
            .set_default("oauth.client_id", "")?
            .set_default("oauth.client_secret", "")?
            .set_default(
                "oauth.auth_url",
                "https://accounts.google.com/o/oauth2/v2/auth",
            )?
            .set_default("oauth.token_url", "https://oauth2.googleapis.com/token")?
            .set_default(
                "oauth.userinfo_url",
                "https://openidconnect.googleapis.com/v1/userinfo",
            )?
            .set_default(
                "oauth.redirect_url",
                "http://127.0.0.1:8080/api/auth/oauth/google/callback",
            )?
            .set_default("mail.smtp_host", "")?
            .set_default("mail.smtp_port", 587)?
            .set_default("mail.smtp_username", "")?
            .set_default("mail.smtp_password", "")?
            .set_default("mail.from", "Music School <no-reply@localhost>")?
            .set_default("mail.use_starttls", true)?
            .set_default("frontend.url", "http://localhost:5173")?
            .set_default("school.name", "Music School")?
            .set_default("school.utc_offset_minutes", 0)?
            .set_default("school.low_credit_threshold", 2)?
            .set_default("school.currency", "INR")?
            .set_default("notifications.keep_alive_secs", 20)?
            .set_default("notifications.channel_capacity", 64)
    }

    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::with_defaults(Config::builder())?
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("MUSIC_SCHOOL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        // 常用的独立环境变量
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("oauth.client_id", std::env::var("GOOGLE_CLIENT_ID").ok())?
            .set_override_option(
                "oauth.client_secret",
                std::env::var("GOOGLE_CLIENT_SECRET").ok(),
            )?
            .set_override_option(
                "oauth.redirect_url",
                std::env::var("OAUTH_REDIRECT_URL").ok(),
            )?
            .set_override_option("mail.smtp_host", std::env::var("SMTP_HOST").ok())?
            .set_override_option("mail.smtp_username", std::env::var("SMTP_USERNAME").ok())?
            .set_override_option("mail.smtp_password", std::env::var("SMTP_PASSWORD").ok())?
            .set_override_option("frontend.url", std::env::var("FRONTEND_URL").ok())?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        // 处理工作线程数
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        Ok(app_config)
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }

    /// 学校时区
    pub fn school_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.school.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }

    /// 学校时区下的今天
    pub fn school_today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.school_offset()).date_naive()
    }

    /// 是否启用了 OAuth 登录
    pub fn oauth_enabled(&self) -> bool {
        !self.oauth.client_id.is_empty() && !self.oauth.client_secret.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load_without_files() {
        let config = AppConfig::load().expect("defaults should deserialize");
        assert!(config.server.workers >= 1);
        assert_eq!(config.cache.cache_type, "moka");
        assert!(config.jwt.access_token_expiry > 0);
    }

    #[test]
    fn test_school_offset_fallback() {
        let mut config = AppConfig::load().unwrap();
        config.school.utc_offset_minutes = 330;
        assert_eq!(config.school_offset().local_minus_utc(), 330 * 60);

        // 超出范围时回退到 UTC
        config.school.utc_offset_minutes = 100_000;
        assert_eq!(config.school_offset().local_minus_utc(), 0);
    }
}
