use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::auth::{CurrentUserResponse, SessionLanding};
use crate::models::{ApiResponse, ErrorCode};

// RequireJWT 已校验会话，这里只读取注入的用户
pub async fn handle_me(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    let landing = SessionLanding::for_user(&user);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CurrentUserResponse { user, landing },
        "Current user retrieved",
    )))
}
