use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::ApiResponse;
use crate::realtime::RankingBroadcaster;
use crate::services::error_response;
use crate::storage::Storage;

/// 公开的排行榜与获奖名单查询，客户端重连后用它对齐状态
pub struct ResultsService;

impl ResultsService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn get_results(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let broadcaster = request
            .app_data::<web::Data<RankingBroadcaster>>()
            .expect("RankingBroadcaster not found in app data");

        match broadcaster.current_leaderboards().await {
            Ok(boards) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                boards,
                "Results retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    // 尚未公布任何获奖者时返回空列表
    pub async fn get_winners(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = request
            .app_data::<web::Data<Arc<dyn Storage>>>()
            .expect("Storage not found in app data");

        match storage.list_public_winners().await {
            Ok(winners) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                winners,
                "Winners retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }
}
