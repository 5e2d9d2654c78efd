use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

use super::AuthService;

/// 清除当前会话，之后该会话签发的令牌全部失效
pub async fn handle_logout(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Authentication required",
            )));
        }
    };
    let Some(session_id) = user.active_session_id.as_deref() else {
        return Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Logged out")));
    };

    let storage = service.get_storage(request);
    match storage.end_session(user.id, session_id).await {
        Ok(_) => {
            info!("User {} logged out", user.username);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Logged out")))
        }
        Err(e) => {
            error!("Failed to end session for user {}: {}", user.id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Logout failed",
                )),
            )
        }
    }
}
