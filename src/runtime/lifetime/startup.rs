use crate::ai::{ScoringOracle, create_oracle};
use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{HackHubError, Result};
use crate::services::notifications::EvaluationNotifier;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub notifier: EvaluationNotifier,
    pub oracle: Arc<dyn ScoringOracle>,
}

// 按名称构造缓存后端
async fn try_cache_backend(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let Some(constructor) = get_object_cache_plugin(name) else {
        warn!("Cache backend '{}' not found in registry", name);
        return None;
    };
    match constructor().await {
        Ok(cache) => {
            info!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();
    info!("Attempting to create {} cache backend", cache_type);

    if let Some(cache) = try_cache_backend(cache_type).await {
        return Ok(cache);
    }
    if cache_type != "moka" {
        warn!("Falling back to memory cache");
        if let Some(cache) = try_cache_backend("moka").await {
            return Ok(cache);
        }
    }

    Err(HackHubError::cache_plugin_not_found(format!(
        "No cache backend available (tried: {cache_type})"
    )))
}

/// 准备服务器启动的上下文
/// 包括存储、缓存、评审通知通道与评分预言机
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 已安装过时返回 Err，可以忽略
    let _ = rustls::crypto::ring::default_provider().install_default();

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    info!("Storage backend initialized and migrations completed");

    let cache = create_cache().await?;
    info!("Cache backend initialized");

    let notifier = EvaluationNotifier::default();
    notifier.spawn_log_subscriber();

    let oracle = create_oracle(&config.ai_assist);
    info!(
        "AI assist provider: {} (timeout {}s)",
        oracle.name(),
        config.ai_assist.timeout_secs
    );

    Ok(StartupContext {
        storage,
        cache,
        notifier,
        oracle,
    })
}
