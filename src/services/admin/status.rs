//! 开放/关闭选手与环节，决定评委端能看到什么

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::BTreeSet;
use tracing::info;

use super::AdminService;
use crate::models::candidates::requests::{BatchUpdateCandidatesRequest, UpdateStatusRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::realtime::ServerEvent;
use crate::services::error_response;

pub async fn update_candidate_status(
    service: &AdminService,
    candidate_id: i64,
    body: UpdateStatusRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.update_candidate_status(candidate_id, body.status).await {
        Ok(Some(candidate)) => {
            info!("Candidate {} is now {}", candidate.id, candidate.status);
            let broadcaster = service.get_broadcaster(request);
            broadcaster.signal(ServerEvent::CandidateStatusChanged {
                contest_id: candidate.contest_id,
                candidate_id: Some(candidate.id),
                status: Some(candidate.status),
            });
            broadcaster.signal(ServerEvent::JudgingProgressUpdated);

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                candidate,
                "Candidate status updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CandidateNotFound,
            "Candidate not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_contest_candidates_status(
    service: &AdminService,
    contest_id: i64,
    body: UpdateStatusRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
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

    match storage
        .update_contest_candidates_status(contest_id, body.status)
        .await
    {
        Ok(updated) => {
            info!(
                "{} candidate(s) of contest {} set to {}",
                updated, contest_id, body.status
            );
            let broadcaster = service.get_broadcaster(request);
            broadcaster.signal(ServerEvent::CandidateStatusChanged {
                contest_id,
                candidate_id: None,
                status: Some(body.status),
            });
            broadcaster.signal(ServerEvent::JudgingProgressUpdated);

            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(format!(
                "{updated} candidate(s) updated"
            ))))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn batch_update_candidates(
    service: &AdminService,
    body: BatchUpdateCandidatesRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if body.candidates.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "No candidates to update",
        )));
    }
    let storage = service.get_storage(request);

    let ids: Vec<i64> = body.candidates.iter().map(|c| c.id).collect();
    let contest_ids: BTreeSet<i64> = match storage.get_candidates_by_ids(&ids).await {
        Ok(found) if found.len() == ids.iter().collect::<BTreeSet<_>>().len() => {
            found.into_iter().map(|c| c.contest_id).collect()
        }
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CandidateNotFound,
                "One or more candidates not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    match storage.batch_update_candidates(body.candidates).await {
        Ok(updated) => {
            info!("Batch updated {} candidate(s)", updated);
            let broadcaster = service.get_broadcaster(request);
            for contest_id in contest_ids {
                broadcaster.signal(ServerEvent::CandidateStatusChanged {
                    contest_id,
                    candidate_id: None,
                    status: None,
                });
            }
            broadcaster.signal(ServerEvent::JudgingProgressUpdated);

            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(format!(
                "{updated} candidate(s) updated"
            ))))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_segment_status(
    service: &AdminService,
    segment_id: i64,
    body: UpdateStatusRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.update_segment_status(segment_id, body.status).await {
        Ok(Some(segment)) => {
            info!("Segment {} is now {}", segment.id, segment.status);
            let broadcaster = service.get_broadcaster(request);
            broadcaster.signal(ServerEvent::SegmentStatusChanged {
                contest_id: segment.contest_id,
                segment_id: segment.id,
                status: segment.status,
            });
            broadcaster.signal(ServerEvent::JudgingProgressUpdated);

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                segment,
                "Segment status updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SegmentNotFound,
            "Segment not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
