//! 统一错误处理模块
//!
//! 使用宏生成错误类型，每个变体带有稳定的错误代码和类型名称。

use std::fmt;

use actix_web::http::StatusCode;

use crate::models::ErrorCode;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_tabulation_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum TabulationError {
            $($variant(String),)*
        }

        impl TabulationError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(TabulationError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(TabulationError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(TabulationError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl TabulationError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        TabulationError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_tabulation_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Validation("E004", "Validation Error"),
    NotFound("E005", "Resource Not Found"),
    Serialization("E006", "Serialization Error"),
    Authentication("E007", "Authentication Error"),
    Authorization("E008", "Authorization Error"),
    Conflict("E009", "Already Submitted"),
    Realtime("E010", "Realtime Delivery Error"),
}

impl TabulationError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 映射为 HTTP 状态码与业务错误码
    pub fn http_status(&self) -> (StatusCode, ErrorCode) {
        match self {
            TabulationError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
            TabulationError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            TabulationError::Authentication(_) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized)
            }
            TabulationError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
            TabulationError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::AlreadySubmitted),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
            ),
        }
    }

    /// 是否为客户端可见的业务错误（4xx）
    pub fn is_client_error(&self) -> bool {
        self.http_status().0.is_client_error()
    }
}

impl fmt::Display for TabulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TabulationError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for TabulationError {
    fn from(err: sea_orm::DbErr) -> Self {
        // 唯一约束冲突说明同一评分已存在，按重复提交处理
        if let Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            tracing::debug!("Unique constraint violated: {}", detail);
            return TabulationError::conflict("Scores already submitted");
        }
        TabulationError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for TabulationError {
    fn from(err: std::io::Error) -> Self {
        TabulationError::DatabaseConfig(err.to_string())
    }
}

impl From<serde_json::Error> for TabulationError {
    fn from(err: serde_json::Error) -> Self {
        TabulationError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TabulationError>;
