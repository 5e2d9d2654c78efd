pub mod awards;
pub mod judging_status;
pub mod kpis;
pub mod list_scores;
pub mod special_scores;
pub mod status;
pub mod unlock;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::awards::requests::{AssignWinnerRequest, CreateAwardRequest};
use crate::models::candidates::requests::{BatchUpdateCandidatesRequest, UpdateStatusRequest};
use crate::models::scores::requests::{
    JudgingStatusQuery, SaveSpecialScoresRequest, ScoreListQuery, SpecialScoresQuery,
    UnlockCandidateScoresRequest, UnlockScoresRequest,
};
use crate::realtime::RankingBroadcaster;
use crate::storage::Storage;

pub struct AdminService {
    storage: Option<Arc<dyn Storage>>,
}

impl AdminService {
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

    // 管理员环节得分表
    pub async fn get_special_scores(
        &self,
        query: SpecialScoresQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        special_scores::get_special_scores(self, query, request).await
    }

    // 保存管理员环节得分（覆盖写入）
    pub async fn save_special_scores(
        &self,
        body: SaveSpecialScoresRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        special_scores::save_special_scores(self, body, request).await
    }

    // 解锁评委在整个环节的评分
    pub async fn unlock_scores(
        &self,
        body: UnlockScoresRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        unlock::unlock_scores(self, body, request).await
    }

    // 解锁评委对单个选手的评分
    pub async fn unlock_candidate_scores(
        &self,
        body: UnlockCandidateScoresRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        unlock::unlock_candidate_scores(self, body, request).await
    }

    // 环节评审进度
    pub async fn judging_status(
        &self,
        query: JudgingStatusQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        judging_status::judging_status(self, query, request).await
    }

    // 原始评分列表
    pub async fn list_scores(
        &self,
        query: ScoreListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list_scores::list_scores(self, query, request).await
    }

    // KPI 快照
    pub async fn kpis(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        kpis::get_kpis(self, request).await
    }

    pub async fn update_candidate_status(
        &self,
        candidate_id: i64,
        body: UpdateStatusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        status::update_candidate_status(self, candidate_id, body, request).await
    }

    pub async fn update_contest_candidates_status(
        &self,
        contest_id: i64,
        body: UpdateStatusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        status::update_contest_candidates_status(self, contest_id, body, request).await
    }

    pub async fn batch_update_candidates(
        &self,
        body: BatchUpdateCandidatesRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        status::batch_update_candidates(self, body, request).await
    }

    pub async fn update_segment_status(
        &self,
        segment_id: i64,
        body: UpdateStatusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        status::update_segment_status(self, segment_id, body, request).await
    }

    // 奖项列表
    pub async fn list_awards(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        awards::list_awards(self, request).await
    }

    pub async fn create_award(
        &self,
        body: CreateAwardRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        awards::create_award(self, body, request).await
    }

    pub async fn delete_award(
        &self,
        award_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        awards::delete_award(self, award_id, request).await
    }

    // 指定获奖者（同一奖项覆盖）
    pub async fn assign_award_winner(
        &self,
        body: AssignWinnerRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        awards::assign_winner(self, body, request).await
    }
}
