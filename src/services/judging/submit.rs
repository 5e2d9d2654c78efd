use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::JudgingService;
use super::gateway::{self, ScoreBatch};
use crate::errors::TabulationError;
use crate::models::scores::{
    requests::{SubmitCandidateScoresRequest, SubmitSegmentScoresRequest},
    responses::SubmissionResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

// 校验失败统一使用评分校验错误码
fn rejection_response(err: &TabulationError) -> HttpResponse {
    match err {
        TabulationError::Validation(msg) => HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::ScoreValidationFailed, msg.as_str()),
        ),
        other => error_response(other),
    }
}

async fn commit_and_publish(
    service: &JudgingService,
    batch: ScoreBatch,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let guard = service.get_guard(request);
    let (judge_id, segment_id, scope) = (batch.judge_id, batch.segment_id, batch.scope);

    match gateway::commit_batch(storage.as_ref(), &guard, batch).await {
        Ok(inserted) => {
            info!(
                "Judge {} submitted {} score(s) for segment {} ({:?})",
                judge_id, inserted, segment_id, scope
            );
            // 推送失败只记录日志，评分已经持久化
            service.get_broadcaster(request).scores_changed().await;

            Ok(HttpResponse::Created().json(ApiResponse::success(
                SubmissionResponse { inserted },
                "Scores submitted successfully",
            )))
        }
        Err(e) => {
            warn!(
                "Score submission rejected for judge {} segment {}: {}",
                judge_id, segment_id, e
            );
            Ok(rejection_response(&e))
        }
    }
}

pub async fn submit_segment_scores(
    service: &JudgingService,
    submission: SubmitSegmentScoresRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let judge = match JudgingService::current_judge(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match gateway::prepare_segment_batch(storage.as_ref(), judge.id, &submission.scores).await {
        Ok(batch) => commit_and_publish(service, batch, request).await,
        Err(e) => Ok(rejection_response(&e)),
    }
}

pub async fn submit_candidate_scores(
    service: &JudgingService,
    submission: SubmitCandidateScoresRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let judge = match JudgingService::current_judge(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match gateway::prepare_candidate_batch(storage.as_ref(), judge.id, &submission).await {
        Ok(batch) => commit_and_publish(service, batch, request).await,
        Err(e) => Ok(rejection_response(&e)),
    }
}
