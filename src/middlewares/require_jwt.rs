/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>` 的签名与有效期，随后从存储加载用户，
 * 并要求令牌中的会话 ID 与用户当前的 `active_session_id` 一致。
 * 旧会话签发的令牌即使尚未过期也会被拒绝（401 / SessionExpired）。
 *
 * ```rust,ignore
 * web::scope("/api/v1/judging")
 *     .wrap(RequireRole::new_any(UserRole::judge_roles()))
 *     .wrap(RequireJWT)
 * ```
 *
 * 通过后用户实体写入请求扩展，处理程序用 `RequireJWT::extract_user_claims` 读取。
 */

use crate::models::{ErrorCode, users::entities};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

// 认证失败原因
#[derive(Debug)]
enum AuthRejection {
    MissingToken,
    InvalidToken,
    UnknownUser,
    StaleSession,
    Internal(String),
}

impl AuthRejection {
    fn response_parts(&self) -> (StatusCode, ErrorCode, &'static str) {
        match self {
            AuthRejection::MissingToken => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Missing or invalid Authorization header",
            ),
            AuthRejection::InvalidToken | AuthRejection::UnknownUser => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Invalid or expired token",
            ),
            AuthRejection::StaleSession => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::SessionExpired,
                "Session has been replaced by a newer login",
            ),
            AuthRejection::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Failed to verify session",
            ),
        }
    }
}

/// 校验令牌并确认会话仍然有效，供 HTTP 中间件与 WebSocket 认证共用
pub async fn authenticate_token(
    storage: &Arc<dyn Storage>,
    token: &str,
) -> Result<entities::User, String> {
    resolve_user(storage, token)
        .await
        .map_err(|rejection| rejection.response_parts().2.to_string())
}

async fn resolve_user(
    storage: &Arc<dyn Storage>,
    token: &str,
) -> Result<entities::User, AuthRejection> {
    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        AuthRejection::InvalidToken
    })?;

    let user_id = claims.user_id().ok_or(AuthRejection::InvalidToken)?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| AuthRejection::Internal(e.to_string()))?
        .ok_or(AuthRejection::UnknownUser)?;

    if !user.is_current_session(&claims.sid) {
        return Err(AuthRejection::StaleSession);
    }

    Ok(user)
}

async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<entities::User, AuthRejection> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthRejection::MissingToken)?;

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .ok_or_else(|| AuthRejection::Internal("Storage not found in app data".to_string()))?
        .get_ref()
        .clone();

    resolve_user(&storage, token).await
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(rejection) => {
                    if let AuthRejection::Internal(ref e) = rejection {
                        error!("Session lookup failed for {}: {}", req.path(), e);
                    } else {
                        info!(
                            "JWT authentication failed for request to {}: {:?}",
                            req.path(),
                            rejection
                        );
                    }
                    let (status, code, message) = rejection.response_parts();
                    Ok(req.into_response(
                        create_error_response(status, code, message).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中提取当前用户
    /// 仅在应用了 RequireJWT 的路由中有值
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<entities::User> {
        req.extensions().get::<entities::User>().cloned()
    }
}
