pub mod admin;
pub mod auth;
pub mod judging;
pub mod results;
pub mod websocket;

use actix_web::HttpResponse;
use tracing::error;

use crate::errors::TabulationError;
use crate::models::ApiResponse;

pub use admin::AdminService;
pub use auth::AuthService;
pub use judging::{JudgingService, SubmissionGuard};
pub use results::ResultsService;
pub use websocket::WebSocketService;

/// 业务错误转换为统一的 JSON 响应，服务端错误不向客户端暴露细节
pub(crate) fn error_response(err: &TabulationError) -> HttpResponse {
    let (status, _) = err.http_status();
    if !err.is_client_error() {
        error!("{}", err);
    }
    HttpResponse::build(status).json(ApiResponse::from_error(err))
}
