use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::TabulationError;
use crate::models::ErrorCode;

/// REST 接口统一包裹：`code` 为业务码，成功时为 0
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    fn envelope(code: ErrorCode, data: Option<T>, message: String) -> Self {
        Self {
            code: code as i32,
            message,
            data,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self::envelope(ErrorCode::Success, Some(data), message.into())
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self::envelope(ErrorCode::Success, None, message.into())
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::envelope(code, None, message.into())
    }

    /// 业务错误直接带出消息，服务端错误只给通用提示
    pub fn from_error(err: &TabulationError) -> Self {
        let (_, code) = err.http_status();
        if err.is_client_error() {
            Self::error_empty(code, err.message())
        } else {
            Self::error_empty(code, "Internal server error")
        }
    }
}
