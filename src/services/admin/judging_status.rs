use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::errors::Result;
use crate::models::judging::responses::{JudgeSummary, JudgingStatusResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::models::scores::requests::JudgingStatusQuery;
use crate::models::segments::entities::Segment;
use crate::services::error_response;
use crate::storage::Storage;

/// 全部评委 × 开放选手的锁定情况
pub async fn build_judging_status(
    storage: &dyn Storage,
    segment: &Segment,
) -> Result<JudgingStatusResponse> {
    let judges = storage
        .list_judges()
        .await?
        .into_iter()
        .map(|u| JudgeSummary {
            id: u.id,
            username: u.username,
        })
        .collect();
    let candidates = storage
        .list_candidates_by_contest(segment.contest_id, true)
        .await?;
    let locked_map = storage
        .segment_lock_pairs(segment.id)
        .await?
        .into_iter()
        .map(|(judge_id, candidate_id)| {
            (JudgingStatusResponse::lock_key(judge_id, candidate_id), true)
        })
        .collect();

    Ok(JudgingStatusResponse {
        judges,
        candidates,
        locked_map,
    })
}

pub async fn judging_status(
    service: &AdminService,
    query: JudgingStatusQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let segment = match storage.get_segment_by_id(query.segment_id).await {
        Ok(Some(segment)) => segment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SegmentNotFound,
                "Segment not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    match build_judging_status(storage.as_ref(), &segment).await {
        Ok(status) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            status,
            "Judging status retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
