use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;

use super::JudgingService;
use crate::models::judging::responses::JudgeSegmentItem;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn list_segments(
    service: &JudgingService,
    contest_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let judge = match JudgingService::current_judge(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.get_contest_by_id(contest_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ContestNotFound,
                "Contest not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    let segments = match storage.list_segments_by_contest(contest_id).await {
        Ok(segments) => segments,
        Err(e) => return Ok(error_response(&e)),
    };
    let submitted: HashSet<i64> = match storage.submitted_segment_ids(judge.id).await {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => return Ok(error_response(&e)),
    };

    let items: Vec<JudgeSegmentItem> = segments
        .into_iter()
        .filter(|s| s.is_open_for_judges())
        .map(|s| JudgeSegmentItem {
            submitted: submitted.contains(&s.id),
            id: s.id,
            contest_id: s.contest_id,
            name: s.name,
            percentage: s.percentage,
            segment_type: s.segment_type,
            status: s.status,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        items,
        "Segments retrieved successfully",
    )))
}
