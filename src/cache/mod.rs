//! 对象缓存层
//!
//! 后端通过 `declare_object_cache_plugin!` 在进程启动时注册到插件表，
//! 启动阶段按配置的 `cache.type` 取出构造器。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错或值无法解析，调用方按未命中处理
    ExistsButNoValue,
}

impl<T> CacheResult<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            CacheResult::Found(v) => Some(v),
            _ => None,
        }
    }
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// ttl 为秒，0 表示使用后端默认值
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

impl dyn ObjectCache {
    /// 读取并反序列化
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> CacheResult<T> {
        match self.get_raw(key).await {
            CacheResult::Found(raw) => match serde_json::from_str(&raw) {
                Ok(value) => CacheResult::Found(value),
                Err(e) => {
                    tracing::warn!("Cached value for '{}' is not valid JSON: {}", key, e);
                    CacheResult::ExistsButNoValue
                }
            },
            CacheResult::NotFound => CacheResult::NotFound,
            CacheResult::ExistsButNoValue => CacheResult::ExistsButNoValue,
        }
    }

    /// 序列化后写入
    pub async fn insert_json<T: Serialize + ?Sized>(&self, key: String, value: &T, ttl: u64) {
        match serde_json::to_string(value) {
            Ok(raw) => self.insert_raw(key, raw, ttl).await,
            Err(e) => tracing::warn!("Failed to serialize cache value for '{}': {}", key, e),
        }
    }
}

/// 声明一个缓存后端插件。
///
/// 类型需提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        paste::paste! {
            #[ctor::ctor]
            unsafe fn [<__register_object_cache_ $name>]() {
                $crate::cache::register::register_object_cache_plugin(
                    $name,
                    std::sync::Arc::new(|| {
                        Box::pin(async {
                            let cache = <$ty>::new()
                                .map_err($crate::errors::HackHubError::cache_connection)?;
                            Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                        })
                    }),
                );
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_option() {
        assert_eq!(CacheResult::Found(3).into_option(), Some(3));
        assert_eq!(CacheResult::<i32>::NotFound.into_option(), None);
        assert_eq!(CacheResult::<i32>::ExistsButNoValue.into_option(), None);
    }
}
