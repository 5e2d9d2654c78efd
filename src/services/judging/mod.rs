pub mod gateway;
pub mod guard;
pub mod list_candidates;
pub mod list_contests;
pub mod list_criteria;
pub mod list_segments;
pub mod my_scores;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::scores::requests::{SubmitCandidateScoresRequest, SubmitSegmentScoresRequest};
use crate::models::{ApiResponse, ErrorCode, users::entities::User};
use crate::realtime::RankingBroadcaster;
use crate::storage::Storage;

pub use guard::SubmissionGuard;

pub struct JudgingService {
    storage: Option<Arc<dyn Storage>>,
}

impl JudgingService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_broadcaster(&self, request: &HttpRequest) -> RankingBroadcaster {
        request
            .app_data::<web::Data<RankingBroadcaster>>()
            .expect("RankingBroadcaster not found in app data")
            .get_ref()
            .clone()
    }

    pub(crate) fn get_guard(&self, request: &HttpRequest) -> web::Data<SubmissionGuard> {
        request
            .app_data::<web::Data<SubmissionGuard>>()
            .expect("SubmissionGuard not found in app data")
            .clone()
    }

    // 当前评委，RequireJWT 之后必然存在
    pub(crate) fn current_judge(request: &HttpRequest) -> Result<User, HttpResponse> {
        RequireJWT::extract_user_claims(request).ok_or_else(|| {
            HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Authentication required",
            ))
        })
    }

    // 有待评分环节的比赛
    pub async fn list_contests(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list_contests::list_contests(self, request).await
    }

    // 比赛内开放的评委环节
    pub async fn list_segments(
        &self,
        contest_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list_segments::list_segments(self, contest_id, request).await
    }

    // 环节评分细则
    pub async fn list_criteria(
        &self,
        segment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list_criteria::list_criteria(self, segment_id, request).await
    }

    // 环节可评分选手
    pub async fn list_candidates(
        &self,
        segment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list_candidates::list_candidates(self, segment_id, request).await
    }

    // 评委已锁定的选手
    pub async fn locked_candidates(
        &self,
        segment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list_candidates::locked_candidates(self, segment_id, request).await
    }

    // 评委自己的评分
    pub async fn my_scores(
        &self,
        segment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        my_scores::my_scores(self, segment_id, request).await
    }

    // 整环节提交
    pub async fn submit_segment_scores(
        &self,
        submission: SubmitSegmentScoresRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_segment_scores(self, submission, request).await
    }

    // 单选手提交
    pub async fn submit_candidate_scores(
        &self,
        submission: SubmitCandidateScoresRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_candidate_scores(self, submission, request).await
    }
}
