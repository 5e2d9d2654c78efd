use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse, SessionLanding},
};
use crate::utils::password::verify_password;

use super::AuthService;

const FORCE_LOGOUT_REASON: &str = "Your account has signed in from another location";

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let login_request = match login_request.normalized() {
        Ok(login_request) => login_request,
        Err(message) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, message)));
        }
    };
    let storage = service.get_storage(request);
    let config = service.get_config();

    let mut user = match storage.get_user_by_username(&login_request.username).await {
        Ok(Some(user)) if verify_password(&login_request.password, &user.password_hash) => user,
        Ok(_) => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                "Username or password is incorrect",
            )));
        }
        Err(e) => {
            error!("Login lookup failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed",
                )),
            );
        }
    };

    // 新会话立即生效，旧令牌在下一次请求时因会话不匹配而失效
    let session_id = uuid::Uuid::new_v4().to_string();
    let previous = match storage.start_session(user.id, &session_id).await {
        Ok(previous) => previous,
        Err(e) => {
            error!("Failed to rotate session for user {}: {}", user.id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to start session",
                )),
            );
        }
    };

    let access_token = match user.generate_access_token(&session_id) {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to generate JWT token: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            );
        }
    };

    let broadcaster = service.get_broadcaster(request);
    if let Some(previous) = previous.filter(|sid| sid != &session_id) {
        match broadcaster
            .registry()
            .force_logout_session(&previous, FORCE_LOGOUT_REASON)
        {
            Ok(n) if n > 0 => info!(
                "Forced {} stale connection(s) of {} to log out",
                n, user.username
            ),
            Ok(_) => {}
            Err(e) => error!("Failed to deliver force_logout: {}", e),
        }
        broadcaster.publish_kpis().await;
    }

    info!("User {} logged in successfully", user.username);

    user.active_session_id = Some(session_id);
    let response = LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: config.jwt.access_token_expiry * 60,
        landing: SessionLanding::for_user(&user),
        user,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
}
