use std::sync::Arc;

use crate::models::{
    awards::{
        entities::{Award, NewAward, NewAwardWinner},
        responses::PublicWinner,
    },
    candidates::{
        entities::Candidate,
        requests::{CandidateOrderUpdate, CreateCandidateRequest},
    },
    common::ScoringStatus,
    contests::{entities::Contest, requests::CreateContestRequest},
    criteria::{entities::Criterion, requests::CreateCriterionRequest},
    kpi::responses::LastScoreEvent,
    scores::{
        entities::{AdminScore, LockScope, NewAdminScore, NewScore},
        requests::ScoreListQuery,
        responses::{MyScoreItem, ScoreListItem},
    },
    segments::{entities::Segment, requests::CreateSegmentRequest},
    users::{entities::User, requests::CreateUserRequest},
};
use crate::tabulation::AggregationInput;

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;
    // 列出所有评委
    async fn list_judges(&self) -> Result<Vec<User>>;
    // 切换到新会话，返回被替换的旧会话
    async fn start_session(&self, user_id: i64, session_id: &str) -> Result<Option<String>>;
    // 结束会话（仅当仍为当前会话时）
    async fn end_session(&self, user_id: i64, session_id: &str) -> Result<bool>;

    /// 比赛管理方法
    async fn create_contest(&self, contest: CreateContestRequest) -> Result<Contest>;
    async fn get_contest_by_id(&self, id: i64) -> Result<Option<Contest>>;
    async fn list_contests(&self) -> Result<Vec<Contest>>;
    // 删除比赛，级联删除选手、环节、细则与评分
    async fn delete_contest(&self, id: i64) -> Result<bool>;

    /// 选手管理方法
    async fn create_candidate(&self, candidate: CreateCandidateRequest) -> Result<Candidate>;
    async fn get_candidate_by_id(&self, id: i64) -> Result<Option<Candidate>>;
    async fn get_candidates_by_ids(&self, ids: &[i64]) -> Result<Vec<Candidate>>;
    // 按展示顺序列出比赛选手，open_only 时排除已关闭的选手
    async fn list_candidates_by_contest(
        &self,
        contest_id: i64,
        open_only: bool,
    ) -> Result<Vec<Candidate>>;
    async fn update_candidate_status(
        &self,
        id: i64,
        status: ScoringStatus,
    ) -> Result<Option<Candidate>>;
    // 批量设置比赛内所有选手的状态
    async fn update_contest_candidates_status(
        &self,
        contest_id: i64,
        status: ScoringStatus,
    ) -> Result<u64>;
    // 批量更新展示顺序与状态（单个事务）
    async fn batch_update_candidates(&self, updates: Vec<CandidateOrderUpdate>) -> Result<u64>;

    /// 环节与评分细则
    async fn create_segment(&self, segment: CreateSegmentRequest) -> Result<Segment>;
    async fn get_segment_by_id(&self, id: i64) -> Result<Option<Segment>>;
    async fn list_segments_by_contest(&self, contest_id: i64) -> Result<Vec<Segment>>;
    async fn update_segment_status(
        &self,
        id: i64,
        status: ScoringStatus,
    ) -> Result<Option<Segment>>;
    async fn delete_segment(&self, id: i64) -> Result<bool>;
    async fn create_criterion(&self, criterion: CreateCriterionRequest) -> Result<Criterion>;
    async fn list_criteria_by_segment(&self, segment_id: i64) -> Result<Vec<Criterion>>;
    async fn get_criteria_by_ids(&self, ids: &[i64]) -> Result<Vec<Criterion>>;

    /// 评委评分
    // 在同一事务内检查锁定并写入整批评分，已提交时返回 Conflict
    async fn insert_score_batch(
        &self,
        judge_id: i64,
        segment_id: i64,
        scope: LockScope,
        rows: Vec<NewScore>,
    ) -> Result<usize>;
    // 评委在该范围内是否已有评分
    async fn has_submitted(&self, judge_id: i64, segment_id: i64, scope: LockScope)
    -> Result<bool>;
    // 评委在该环节已锁定的选手
    async fn locked_candidate_ids(&self, judge_id: i64, segment_id: i64) -> Result<Vec<i64>>;
    // 评委已提交过评分的环节
    async fn submitted_segment_ids(&self, judge_id: i64) -> Result<Vec<i64>>;
    // 环节内所有 (评委, 选手) 锁定对
    async fn segment_lock_pairs(&self, segment_id: i64) -> Result<Vec<(i64, i64)>>;
    // 解锁：删除评委在该范围内的所有评分
    async fn delete_scores(&self, judge_id: i64, segment_id: i64, scope: LockScope)
    -> Result<u64>;
    async fn list_scores(&self, query: ScoreListQuery) -> Result<Vec<ScoreListItem>>;
    async fn list_judge_scores(&self, judge_id: i64, segment_id: i64) -> Result<Vec<MyScoreItem>>;
    async fn count_scores(&self) -> Result<u64>;
    async fn latest_score_event(&self) -> Result<Option<LastScoreEvent>>;

    /// 管理员环节得分
    // 按 (选手, 环节) 覆盖写入
    async fn upsert_admin_scores(&self, rows: Vec<NewAdminScore>) -> Result<usize>;
    async fn list_admin_scores_by_contest(&self, contest_id: i64) -> Result<Vec<AdminScore>>;

    /// 汇总数据
    async fn load_aggregation_input(&self) -> Result<AggregationInput>;

    /// 奖项
    // 名称重复时返回 Conflict
    async fn create_award(&self, award: NewAward) -> Result<Award>;
    async fn get_award_by_id(&self, id: i64) -> Result<Option<Award>>;
    async fn list_awards(&self) -> Result<Vec<Award>>;
    // 删除奖项，级联删除获奖记录
    async fn delete_award(&self, id: i64) -> Result<bool>;
    // 每个奖项一名获奖者，再次指定即覆盖
    async fn assign_award_winner(&self, winner: NewAwardWinner) -> Result<()>;
    async fn list_public_winners(&self) -> Result<Vec<PublicWinner>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
