use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::services::WebSocketService;
use crate::services::websocket::WsConnectQuery;

pub async fn connect(
    req: HttpRequest,
    body: web::Payload,
    query: web::Query<WsConnectQuery>,
) -> ActixResult<HttpResponse> {
    WebSocketService::connect(req, body, query.into_inner()).await
}

// 身份通过 ?token= 或连接后的 client_auth 绑定
pub fn configure_ws_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/ws", web::get().to(connect));
}
