use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AdminService;
use crate::models::ApiResponse;
use crate::models::scores::{
    entities::LockScope,
    requests::{UnlockCandidateScoresRequest, UnlockScoresRequest},
    responses::UnlockResponse,
};
use crate::realtime::ServerEvent;
use crate::services::error_response;

// 删除评分行即解除锁定，之后重算排行榜并通知评委端
async fn unlock(
    service: &AdminService,
    judge_id: i64,
    segment_id: i64,
    scope: LockScope,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_scores(judge_id, segment_id, scope).await {
        Ok(deleted) => {
            info!(
                "Unlocked judge {} segment {} ({:?}): {} score(s) removed",
                judge_id, segment_id, scope, deleted
            );
            let broadcaster = service.get_broadcaster(request);
            broadcaster.signal(ServerEvent::ScoresUnlocked {
                judge_id,
                segment_id,
                candidate_id: scope.candidate_id(),
            });
            broadcaster.scores_changed().await;

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UnlockResponse { deleted },
                "Scores unlocked successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn unlock_scores(
    service: &AdminService,
    body: UnlockScoresRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    unlock(
        service,
        body.judge_id,
        body.segment_id,
        LockScope::Segment,
        request,
    )
    .await
}

pub async fn unlock_candidate_scores(
    service: &AdminService,
    body: UnlockCandidateScoresRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    unlock(
        service,
        body.judge_id,
        body.segment_id,
        LockScope::Candidate(body.candidate_id),
        request,
    )
    .await
}
