use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;

use super::JudgingService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::contests::entities::Contest;
use crate::services::error_response;
use crate::storage::Storage;

/// 至少有一个开放且该评委尚未评分的评委环节的比赛
pub async fn pending_contests(storage: &dyn Storage, judge_id: i64) -> Result<Vec<Contest>> {
    let submitted: HashSet<i64> = storage
        .submitted_segment_ids(judge_id)
        .await?
        .into_iter()
        .collect();

    let mut pending = Vec::new();
    for contest in storage.list_contests().await? {
        let segments = storage.list_segments_by_contest(contest.id).await?;
        if segments
            .iter()
            .any(|s| s.is_open_for_judges() && !submitted.contains(&s.id))
        {
            pending.push(contest);
        }
    }
    Ok(pending)
}

pub async fn list_contests(
    service: &JudgingService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let judge = match JudgingService::current_judge(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match pending_contests(storage.as_ref(), judge.id).await {
        Ok(contests) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            contests,
            "Contests retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
