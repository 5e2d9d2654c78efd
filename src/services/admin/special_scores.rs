use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{info, warn};

use super::AdminService;
use crate::errors::{Result, TabulationError};
use crate::models::scores::{
    entities::NewAdminScore,
    requests::{SaveSpecialScoresRequest, SpecialScoreEntry, SpecialScoresQuery},
    responses::{SpecialScoreRow, SpecialScoresResponse, SubmissionResponse},
};
use crate::models::segments::entities::{Segment, SegmentType};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::storage::Storage;
use crate::utils::validate::validate_score;

/// 管理员环节得分满分
pub const ADMIN_SEGMENT_MAX: f64 = 100.0;

/// 校验管理员得分：选手与环节必须存在、环节为管理员类型且同属一个比赛
pub async fn prepare_admin_scores(
    storage: &dyn Storage,
    entries: &[SpecialScoreEntry],
) -> Result<Vec<NewAdminScore>> {
    if entries.is_empty() {
        return Err(TabulationError::validation("No scores submitted"));
    }

    let candidate_ids: Vec<i64> = entries
        .iter()
        .map(|e| e.candidate_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let candidates: HashMap<i64, _> = storage
        .get_candidates_by_ids(&candidate_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let mut segments: HashMap<i64, Segment> = HashMap::new();
    for segment_id in entries.iter().map(|e| e.segment_id).collect::<BTreeSet<_>>() {
        let segment = storage.get_segment_by_id(segment_id).await?.ok_or_else(|| {
            TabulationError::not_found(format!("Segment {segment_id} not found"))
        })?;
        segments.insert(segment_id, segment);
    }

    let mut rows = Vec::with_capacity(entries.len());
    for entry in entries {
        let candidate = candidates.get(&entry.candidate_id).ok_or_else(|| {
            TabulationError::not_found(format!("Candidate {} not found", entry.candidate_id))
        })?;
        let segment = segments.get(&entry.segment_id).ok_or_else(|| {
            TabulationError::not_found(format!("Segment {} not found", entry.segment_id))
        })?;

        if segment.segment_type != SegmentType::Admin {
            return Err(TabulationError::validation(format!(
                "Segment '{}' is scored by judges",
                segment.name
            )));
        }
        // 比赛取自选手，环节必须属于同一比赛
        if segment.contest_id != candidate.contest_id {
            return Err(TabulationError::validation(format!(
                "Segment '{}' does not belong to the contest of candidate #{}",
                segment.name, candidate.candidate_number
            )));
        }
        validate_score(entry.score, ADMIN_SEGMENT_MAX).map_err(TabulationError::validation)?;

        rows.push(NewAdminScore {
            candidate_id: candidate.id,
            segment_id: segment.id,
            contest_id: candidate.contest_id,
            score: entry.score,
        });
    }
    Ok(rows)
}

pub async fn get_special_scores(
    service: &AdminService,
    query: SpecialScoresQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_contest_by_id(query.contest_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ContestNotFound,
                "Contest not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    let grid = async {
        let candidates = storage
            .list_candidates_by_contest(query.contest_id, false)
            .await?;
        let segments: Vec<Segment> = storage
            .list_segments_by_contest(query.contest_id)
            .await?
            .into_iter()
            .filter(|s| s.segment_type == SegmentType::Admin)
            .collect();
        let stored: HashMap<(i64, i64), f64> = storage
            .list_admin_scores_by_contest(query.contest_id)
            .await?
            .into_iter()
            .map(|s| ((s.candidate_id, s.segment_id), s.score))
            .collect();

        let rows = candidates
            .into_iter()
            .map(|c| {
                let scores: BTreeMap<i64, Option<f64>> = segments
                    .iter()
                    .map(|s| (s.id, stored.get(&(c.id, s.id)).copied()))
                    .collect();
                SpecialScoreRow {
                    candidate_id: c.id,
                    candidate_number: c.candidate_number,
                    name: c.name,
                    scores,
                }
            })
            .collect();

        Ok::<_, TabulationError>(SpecialScoresResponse { segments, rows })
    }
    .await;

    match grid {
        Ok(grid) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            grid,
            "Special scores retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn save_special_scores(
    service: &AdminService,
    body: SaveSpecialScoresRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let rows = match prepare_admin_scores(storage.as_ref(), &body.scores).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Special scores rejected: {}", e);
            return Ok(match e {
                TabulationError::Validation(msg) => HttpResponse::BadRequest().json(
                    ApiResponse::error_empty(ErrorCode::ScoreValidationFailed, msg),
                ),
                other => error_response(&other),
            });
        }
    };

    match storage.upsert_admin_scores(rows).await {
        Ok(inserted) => {
            info!("Saved {} special score(s)", inserted);
            service.get_broadcaster(request).publish_results().await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmissionResponse { inserted },
                "Special scores saved successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
