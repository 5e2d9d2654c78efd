use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;

use super::JudgingService;
use super::list_criteria::open_segment_or_response;
use crate::models::ApiResponse;
use crate::models::judging::responses::{JudgeCandidateItem, LockedCandidatesResponse};
use crate::services::error_response;

/// 开放选手按展示顺序排列，已关闭的选手不出现在评分表中
pub async fn list_candidates(
    service: &JudgingService,
    segment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let judge = match JudgingService::current_judge(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let segment = match open_segment_or_response(storage.as_ref(), segment_id).await {
        Ok(segment) => segment,
        Err(resp) => return Ok(resp),
    };

    let candidates = match storage
        .list_candidates_by_contest(segment.contest_id, true)
        .await
    {
        Ok(candidates) => candidates,
        Err(e) => return Ok(error_response(&e)),
    };
    let locked: HashSet<i64> = match storage.locked_candidate_ids(judge.id, segment.id).await {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => return Ok(error_response(&e)),
    };

    let items: Vec<JudgeCandidateItem> = candidates
        .into_iter()
        .map(|c| JudgeCandidateItem {
            locked: locked.contains(&c.id),
            id: c.id,
            name: c.name,
            candidate_number: c.candidate_number,
            image_url: c.image_url,
            display_order: c.display_order,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        items,
        "Candidates retrieved successfully",
    )))
}

pub async fn locked_candidates(
    service: &JudgingService,
    segment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let judge = match JudgingService::current_judge(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.locked_candidate_ids(judge.id, segment_id).await {
        Ok(candidate_ids) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            LockedCandidatesResponse { candidate_ids },
            "Locked candidates retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
