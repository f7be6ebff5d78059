use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 内置默认值，保证没有配置文件也能启动
            .set_default("app.system_name", "HackHub")?
            .set_default("app.environment", "development")?
            .set_default("app.log_level", "info")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.unix_socket_path", "")?
            .set_default("server.workers", 0)?
            .set_default("server.max_workers", 16)?
            .set_default("server.timeouts.client_request", 5000)?
            .set_default("server.timeouts.client_disconnect", 1000)?
            .set_default("server.timeouts.keep_alive", 30)?
            .set_default("server.limits.max_payload_size", 1_048_576)?
            .set_default("jwt.secret", "")?
            .set_default("database.url", "hackhub.db")?
            .set_default("database.pool_size", 10)?
            .set_default("database.timeout", 10)?
            .set_default("cache.type", "moka")?
            .set_default("cache.default_ttl", 300)?
            .set_default("cache.redis.url", "redis://127.0.0.1:6379")?
            .set_default("cache.redis.key_prefix", "hackhub:")?
            .set_default("cache.redis.pool_size", 8)?
            .set_default("cache.memory.max_capacity", 10_000)?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            .set_default("cors.allowed_methods", Vec::<String>::new())?
            .set_default("cors.allowed_headers", Vec::<String>::new())?
            .set_default("cors.max_age", 3600)?
            .set_default("evaluation.default_score_min", 0.0)?
            .set_default("evaluation.default_score_max", 10.0)?
            .set_default("evaluation.final_uniqueness", "target")?
            .set_default("evaluation.tracking_cache_ttl", 30)?
            .set_default("ai_assist.provider", "disabled")?
            .set_default("ai_assist.endpoint", "http://localhost:11434")?
            .set_default("ai_assist.model", "qwen2.5:7b")?
            .set_default("ai_assist.timeout_secs", 60)?
            .set_default("ai_assist.temperature", 0.2)?
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
                Environment::with_prefix("HACKHUB")
                    .separator("__")
                    .try_parsing(true),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("cache.redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option(
                "cache.redis.key_prefix",
                std::env::var("REDIS_KEY_PREFIX").ok(),
            )?
            .set_override_option(
                "ai_assist.endpoint",
                std::env::var("AI_ASSIST_ENDPOINT").ok(),
            )?
            .set_override_option("ai_assist.model", std::env::var("AI_ASSIST_MODEL").ok())?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        // 处理工作线程数
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        app_config.validate()?;

        Ok(app_config)
    }

    /// 校验评审相关配置
    fn validate(&self) -> Result<(), ConfigError> {
        let eval = &self.evaluation;
        if eval.default_score_min >= eval.default_score_max {
            return Err(ConfigError::Message(format!(
                "evaluation.default_score_min ({}) must be lower than default_score_max ({})",
                eval.default_score_min, eval.default_score_max
            )));
        }
        if eval.final_uniqueness != "target" && eval.final_uniqueness != "reviewer" {
            return Err(ConfigError::Message(format!(
                "evaluation.final_uniqueness must be 'target' or 'reviewer', got '{}'",
                eval.final_uniqueness
            )));
        }
        Ok(())
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

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// final 评审是否按评审人区分唯一性
    pub fn final_per_reviewer(&self) -> bool {
        self.evaluation.final_uniqueness == "reviewer"
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
}
