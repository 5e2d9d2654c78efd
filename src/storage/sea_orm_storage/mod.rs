//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod admin_scores;
mod aggregation;
mod awards;
mod candidates;
mod contests;
mod criteria;
mod scores;
mod segments;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, TabulationError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::from_url(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接指定数据库并执行迁移
    pub async fn from_url(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| TabulationError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| TabulationError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("wal_autocheckpoint", "1000");

        // 内存数据库随最后一个连接关闭而消失，不能回收空闲连接
        let idle_timeout = (!in_memory).then(|| Duration::from_secs(300));

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(idle_timeout)
            .max_lifetime(if in_memory { None } else { Some(Duration::from_secs(1800)) })
            .connect_with(opt)
            .await
            .map_err(|e| TabulationError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(pool_size.min(5))
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| TabulationError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(TabulationError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use crate::tabulation::AggregationInput;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn list_judges(&self) -> Result<Vec<User>> {
        self.list_judges_impl().await
    }

    async fn start_session(&self, user_id: i64, session_id: &str) -> Result<Option<String>> {
        self.start_session_impl(user_id, session_id).await
    }

    async fn end_session(&self, user_id: i64, session_id: &str) -> Result<bool> {
        self.end_session_impl(user_id, session_id).await
    }

    // 比赛模块
    async fn create_contest(&self, contest: CreateContestRequest) -> Result<Contest> {
        self.create_contest_impl(contest).await
    }

    async fn get_contest_by_id(&self, id: i64) -> Result<Option<Contest>> {
        self.get_contest_by_id_impl(id).await
    }

    async fn list_contests(&self) -> Result<Vec<Contest>> {
        self.list_contests_impl().await
    }

    async fn delete_contest(&self, id: i64) -> Result<bool> {
        self.delete_contest_impl(id).await
    }

    // 选手模块
    async fn create_candidate(&self, candidate: CreateCandidateRequest) -> Result<Candidate> {
        self.create_candidate_impl(candidate).await
    }

    async fn get_candidate_by_id(&self, id: i64) -> Result<Option<Candidate>> {
        self.get_candidate_by_id_impl(id).await
    }

    async fn get_candidates_by_ids(&self, ids: &[i64]) -> Result<Vec<Candidate>> {
        self.get_candidates_by_ids_impl(ids).await
    }

    async fn list_candidates_by_contest(
        &self,
        contest_id: i64,
        open_only: bool,
    ) -> Result<Vec<Candidate>> {
        self.list_candidates_by_contest_impl(contest_id, open_only)
            .await
    }

    async fn update_candidate_status(
        &self,
        id: i64,
        status: ScoringStatus,
    ) -> Result<Option<Candidate>> {
        self.update_candidate_status_impl(id, status).await
    }

    async fn update_contest_candidates_status(
        &self,
        contest_id: i64,
        status: ScoringStatus,
    ) -> Result<u64> {
        self.update_contest_candidates_status_impl(contest_id, status)
            .await
    }

    async fn batch_update_candidates(&self, updates: Vec<CandidateOrderUpdate>) -> Result<u64> {
        self.batch_update_candidates_impl(updates).await
    }

    // 环节与细则模块
    async fn create_segment(&self, segment: CreateSegmentRequest) -> Result<Segment> {
        self.create_segment_impl(segment).await
    }

    async fn get_segment_by_id(&self, id: i64) -> Result<Option<Segment>> {
        self.get_segment_by_id_impl(id).await
    }

    async fn list_segments_by_contest(&self, contest_id: i64) -> Result<Vec<Segment>> {
        self.list_segments_by_contest_impl(contest_id).await
    }

    async fn update_segment_status(
        &self,
        id: i64,
        status: ScoringStatus,
    ) -> Result<Option<Segment>> {
        self.update_segment_status_impl(id, status).await
    }

    async fn delete_segment(&self, id: i64) -> Result<bool> {
        self.delete_segment_impl(id).await
    }

    async fn create_criterion(&self, criterion: CreateCriterionRequest) -> Result<Criterion> {
        self.create_criterion_impl(criterion).await
    }

    async fn list_criteria_by_segment(&self, segment_id: i64) -> Result<Vec<Criterion>> {
        self.list_criteria_by_segment_impl(segment_id).await
    }

    async fn get_criteria_by_ids(&self, ids: &[i64]) -> Result<Vec<Criterion>> {
        self.get_criteria_by_ids_impl(ids).await
    }

    // 评分模块
    async fn insert_score_batch(
        &self,
        judge_id: i64,
        segment_id: i64,
        scope: LockScope,
        rows: Vec<NewScore>,
    ) -> Result<usize> {
        self.insert_score_batch_impl(judge_id, segment_id, scope, rows)
            .await
    }

    async fn has_submitted(
        &self,
        judge_id: i64,
        segment_id: i64,
        scope: LockScope,
    ) -> Result<bool> {
        self.has_submitted_impl(judge_id, segment_id, scope).await
    }

    async fn locked_candidate_ids(&self, judge_id: i64, segment_id: i64) -> Result<Vec<i64>> {
        self.locked_candidate_ids_impl(judge_id, segment_id).await
    }

    async fn submitted_segment_ids(&self, judge_id: i64) -> Result<Vec<i64>> {
        self.submitted_segment_ids_impl(judge_id).await
    }

    async fn segment_lock_pairs(&self, segment_id: i64) -> Result<Vec<(i64, i64)>> {
        self.segment_lock_pairs_impl(segment_id).await
    }

    async fn delete_scores(
        &self,
        judge_id: i64,
        segment_id: i64,
        scope: LockScope,
    ) -> Result<u64> {
        self.delete_scores_impl(judge_id, segment_id, scope).await
    }

    async fn list_scores(&self, query: ScoreListQuery) -> Result<Vec<ScoreListItem>> {
        self.list_scores_impl(query).await
    }

    async fn list_judge_scores(&self, judge_id: i64, segment_id: i64) -> Result<Vec<MyScoreItem>> {
        self.list_judge_scores_impl(judge_id, segment_id).await
    }

    async fn count_scores(&self) -> Result<u64> {
        self.count_scores_impl().await
    }

    async fn latest_score_event(&self) -> Result<Option<LastScoreEvent>> {
        self.latest_score_event_impl().await
    }

    // 管理员得分模块
    async fn upsert_admin_scores(&self, rows: Vec<NewAdminScore>) -> Result<usize> {
        self.upsert_admin_scores_impl(rows).await
    }

    async fn list_admin_scores_by_contest(&self, contest_id: i64) -> Result<Vec<AdminScore>> {
        self.list_admin_scores_by_contest_impl(contest_id).await
    }

    // 汇总模块
    async fn load_aggregation_input(&self) -> Result<AggregationInput> {
        self.load_aggregation_input_impl().await
    }

    // 奖项模块
    async fn create_award(&self, award: NewAward) -> Result<Award> {
        self.create_award_impl(award).await
    }

    async fn get_award_by_id(&self, id: i64) -> Result<Option<Award>> {
        self.get_award_by_id_impl(id).await
    }

    async fn list_awards(&self) -> Result<Vec<Award>> {
        self.list_awards_impl().await
    }

    async fn delete_award(&self, id: i64) -> Result<bool> {
        self.delete_award_impl(id).await
    }

    async fn assign_award_winner(&self, winner: NewAwardWinner) -> Result<()> {
        self.assign_award_winner_impl(winner).await
    }

    async fn list_public_winners(&self) -> Result<Vec<PublicWinner>> {
        self.list_public_winners_impl().await
    }
}

#[cfg(test)]
mod tests {
    use super::SeaOrmStorage;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("tabulation.db").unwrap(),
            "sqlite://tabulation.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://db/contest").is_ok());
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }
}
