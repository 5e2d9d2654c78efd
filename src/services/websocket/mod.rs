/*!
 * WebSocket 实时通道
 *
 * 客户端连接 `ws://host/api/v1/ws`（可选 `?token=<access_token>` 直接绑定身份），
 * 也可以在连接后发送：
 *
 * ```json
 * {"event": "client_auth", "data": {"token": "<access_token>"}}
 * {"event": "ping"}
 * ```
 *
 * 服务端推送 `{"event": "...", "data": ...}`，连接建立后立即收到 `connected`
 * 与当前的 `update_results`。管理员连接额外收到 `kpi_update`。
 */

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use actix_ws::Message;
use futures_util::StreamExt;
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::middlewares::require_jwt::authenticate_token;
use crate::realtime::{ClientEvent, ConnectedUser, RankingBroadcaster, ServerEvent};
use crate::storage::Storage;

#[derive(Debug, Default, Deserialize)]
pub struct WsConnectQuery {
    pub token: Option<String>,
}

/// 心跳与超时设置
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatPolicy {
    pub interval: Duration,
    pub client_timeout: Duration,
}

impl HeartbeatPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.realtime.heartbeat_interval.max(1)),
            client_timeout: Duration::from_secs(config.realtime.client_timeout.max(1)),
        }
    }
}

pub struct WebSocketService;

impl WebSocketService {
    /// 升级为 WebSocket 并在后台运行会话
    pub async fn connect(
        request: HttpRequest,
        body: web::Payload,
        query: WsConnectQuery,
    ) -> ActixResult<HttpResponse> {
        let broadcaster = request
            .app_data::<web::Data<RankingBroadcaster>>()
            .ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("Realtime channel is not available")
            })?
            .get_ref()
            .clone();

        let (response, session, stream) = actix_ws::handle(&request, body)?;
        let policy = HeartbeatPolicy::from_config(AppConfig::get());

        actix_web::rt::spawn(Self::handle_connection(
            broadcaster,
            policy,
            query.token,
            session,
            stream,
        ));

        Ok(response)
    }

    /// 单个连接的会话循环
    pub async fn handle_connection(
        broadcaster: RankingBroadcaster,
        policy: HeartbeatPolicy,
        token: Option<String>,
        mut session: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
    ) {
        let registry = broadcaster.registry().clone();
        let (connection_id, mut rx) = registry.register();
        info!("WebSocket connected: {}", connection_id);

        let connected = ServerEvent::Connected {
            connection_id: connection_id.to_string(),
        };
        if let Ok(json) = serde_json::to_string(&connected)
            && session.text(json).await.is_err()
        {
            registry.unregister(connection_id);
            return;
        }

        if let Some(token) = token {
            Self::bind_identity(&broadcaster, connection_id, &token).await;
        }

        // 新连接立即拿到当前排行榜
        match broadcaster.current_leaderboards().await {
            Ok(boards) => {
                let event = ServerEvent::UpdateResults(boards);
                if let Err(e) = registry.send_to(connection_id, &event) {
                    warn!(
                        "Failed to queue initial results for {}: {}",
                        connection_id, e
                    );
                }
            }
            Err(e) => warn!("Failed to compute initial results: {}", e),
        }
        broadcaster.publish_kpis().await;

        let mut heartbeat = tokio::time::interval(policy.interval);
        let mut last_seen = Instant::now();

        loop {
            tokio::select! {
                msg = stream.next() => {
                    last_seen = Instant::now();
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            Self::handle_client_event(&broadcaster, connection_id, &text).await;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if session.pong(&data).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            debug!("WebSocket closed by client: {}", connection_id);
                            break;
                        }
                        Some(Err(e)) => {
                            warn!("WebSocket error on {}: {:?}", connection_id, e);
                            break;
                        }
                        _ => {}
                    }
                }

                frame = rx.recv() => {
                    match frame {
                        Some(frame) => {
                            if session.text(frame.to_string()).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }

                _ = heartbeat.tick() => {
                    if last_seen.elapsed() > policy.client_timeout {
                        info!("WebSocket {} timed out", connection_id);
                        break;
                    }
                    if session.ping(b"").await.is_err() {
                        break;
                    }
                }
            }
        }

        registry.unregister(connection_id);
        let _ = session.close(None).await;
        broadcaster.publish_kpis().await;
        info!("WebSocket disconnected: {}", connection_id);
    }

    async fn handle_client_event(
        broadcaster: &RankingBroadcaster,
        connection_id: Uuid,
        text: &str,
    ) {
        let registry = broadcaster.registry();
        match serde_json::from_str::<ClientEvent>(text) {
            Ok(ClientEvent::ClientAuth { token }) => {
                Self::bind_identity(broadcaster, connection_id, &token).await;
            }
            Ok(ClientEvent::Ping) => {
                let _ = registry.send_to(connection_id, &ServerEvent::Pong);
            }
            Err(e) => {
                debug!("Unrecognized message on {}: {}", connection_id, e);
                let _ = registry.send_to(
                    connection_id,
                    &ServerEvent::error("Unrecognized message"),
                );
            }
        }
    }

    // client_auth：校验令牌与当前会话，成功后连接计入在线用户
    async fn bind_identity(broadcaster: &RankingBroadcaster, connection_id: Uuid, token: &str) {
        let registry = broadcaster.registry();
        let storage: &Arc<dyn Storage> = broadcaster.storage();

        match authenticate_token(storage, token).await {
            Ok(user) => {
                let connected = ConnectedUser {
                    user_id: user.id,
                    username: user.username.clone(),
                    role: user.role.clone(),
                    session_id: user.active_session_id.clone().unwrap_or_default(),
                };
                if registry.authenticate(connection_id, connected) {
                    info!(
                        "WebSocket {} authenticated as {}",
                        connection_id, user.username
                    );
                    broadcaster.publish_kpis().await;
                }
            }
            Err(message) => {
                debug!("client_auth rejected on {}: {}", connection_id, message);
                let _ = registry.send_to(connection_id, &ServerEvent::error(message));
            }
        }
    }
}
