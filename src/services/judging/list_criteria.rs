use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::JudgingService;
use crate::models::segments::entities::Segment;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::storage::Storage;

// 评委只能读取开放中的评委环节
pub(super) async fn open_segment_or_response(
    storage: &dyn Storage,
    segment_id: i64,
) -> Result<Segment, HttpResponse> {
    match storage.get_segment_by_id(segment_id).await {
        Ok(Some(segment)) if segment.is_open_for_judges() => Ok(segment),
        Ok(Some(_)) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::SegmentNotOpen,
            "Segment is not open for judging",
        ))),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SegmentNotFound,
            "Segment not found",
        ))),
        Err(e) => Err(error_response(&e)),
    }
}

pub async fn list_criteria(
    service: &JudgingService,
    segment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let segment = match open_segment_or_response(storage.as_ref(), segment_id).await {
        Ok(segment) => segment,
        Err(resp) => return Ok(resp),
    };

    match storage.list_criteria_by_segment(segment.id).await {
        Ok(criteria) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            criteria,
            "Criteria retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
