//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称和 HTTP 状态映射。

use std::fmt;

use actix_web::http::StatusCode;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_hackhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum HackHubError {
            $($variant(String),)*
        }

        impl HackHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(HackHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(HackHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(HackHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl HackHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        HackHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_hackhub_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Conflict Error"),
    NoRubricConfigured("E011", "No Rubric Configured"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    AdapterUnavailable("E014", "Adapter Unavailable"),
}

impl HackHubError {
    /// 对应的 HTTP 状态码，错误种类在响应中原样保留
    pub fn status_code(&self) -> StatusCode {
        match self {
            HackHubError::Validation(_) => StatusCode::BAD_REQUEST,
            HackHubError::Authentication(_) => StatusCode::UNAUTHORIZED,
            HackHubError::Authorization(_) => StatusCode::FORBIDDEN,
            HackHubError::NotFound(_) => StatusCode::NOT_FOUND,
            HackHubError::Conflict(_) | HackHubError::NoRubricConfigured(_) => {
                StatusCode::CONFLICT
            }
            HackHubError::AdapterUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 调用方是否可以重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, HackHubError::AdapterUnavailable(_))
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for HackHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for HackHubError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for HackHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        HackHubError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for HackHubError {
    fn from(err: std::io::Error) -> Self {
        HackHubError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for HackHubError {
    fn from(err: serde_json::Error) -> Self {
        HackHubError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HackHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(HackHubError::cache_connection("test").code(), "E001");
        assert_eq!(HackHubError::database_config("test").code(), "E003");
        assert_eq!(HackHubError::validation("test").code(), "E007");
        assert_eq!(HackHubError::conflict("test").code(), "E010");
        assert_eq!(HackHubError::adapter_unavailable("test").code(), "E014");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            HackHubError::no_rubric_configured("test").error_type(),
            "No Rubric Configured"
        );
        assert_eq!(
            HackHubError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_status_mapping_keeps_kind() {
        assert_eq!(
            HackHubError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HackHubError::conflict("x").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            HackHubError::no_rubric_configured("x").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            HackHubError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            HackHubError::adapter_unavailable("x").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            HackHubError::database_operation("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_only_adapter_errors_are_retryable() {
        assert!(HackHubError::adapter_unavailable("timeout").is_retryable());
        assert!(!HackHubError::conflict("dup").is_retryable());
        assert!(!HackHubError::validation("range").is_retryable());
    }

    #[test]
    fn test_format_simple() {
        let err = HackHubError::validation("Score out of range");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Score out of range"));
    }
}
