//! 评委评分存储
//!
//! 锁定状态完全由评分行是否存在推导，不单独维护锁表。

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::{Candidates, Contests, Criteria, Segments, Users};
use crate::entity::scores::{ActiveModel, Column, Entity as Scores};
use crate::entity::{candidates, contests, criteria, segments, users};
use crate::errors::{Result, TabulationError};
use crate::models::kpi::responses::LastScoreEvent;
use crate::models::scores::{
    entities::{LockScope, NewScore},
    requests::ScoreListQuery,
    responses::{MyScoreItem, ScoreListItem},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

fn scope_filter(judge_id: i64, segment_id: i64, scope: LockScope) -> Select<Scores> {
    let mut select = Scores::find()
        .filter(Column::JudgeId.eq(judge_id))
        .filter(Column::SegmentId.eq(segment_id));
    if let Some(candidate_id) = scope.candidate_id() {
        select = select.filter(Column::CandidateId.eq(candidate_id));
    }
    select
}

async fn scope_exists<C: ConnectionTrait>(
    conn: &C,
    judge_id: i64,
    segment_id: i64,
    scope: LockScope,
) -> Result<bool> {
    let count = scope_filter(judge_id, segment_id, scope)
        .count(conn)
        .await
        .map_err(|e| TabulationError::database_operation(format!("查询评分锁定失败: {e}")))?;
    Ok(count > 0)
}

fn already_submitted(scope: LockScope) -> TabulationError {
    match scope {
        LockScope::Segment => {
            TabulationError::conflict("Scores already submitted for this segment")
        }
        LockScope::Candidate(_) => {
            TabulationError::conflict("Scores already submitted for this candidate")
        }
    }
}

impl SeaOrmStorage {
    /// 在单个事务内检查锁定并写入整批评分
    pub async fn insert_score_batch_impl(
        &self,
        judge_id: i64,
        segment_id: i64,
        scope: LockScope,
        rows: Vec<NewScore>,
    ) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TabulationError::database_operation(format!("开启事务失败: {e}")))?;

        if scope_exists(&txn, judge_id, segment_id, scope).await? {
            // txn 在此处丢弃即回滚
            return Err(already_submitted(scope));
        }

        let now = chrono::Utc::now().timestamp();
        let count = rows.len();
        for row in rows {
            let model = ActiveModel {
                judge_id: Set(row.judge_id),
                candidate_id: Set(row.candidate_id),
                criterion_id: Set(row.criterion_id),
                segment_id: Set(row.segment_id),
                contest_id: Set(row.contest_id),
                score: Set(row.score),
                created_at: Set(now),
                ..Default::default()
            };
            // 唯一索引冲突会被转换为 Conflict
            model.insert(&txn).await.map_err(TabulationError::from)?;
        }

        txn.commit().await.map_err(TabulationError::from)?;

        Ok(count)
    }

    /// 评委在该范围内是否已有评分
    pub async fn has_submitted_impl(
        &self,
        judge_id: i64,
        segment_id: i64,
        scope: LockScope,
    ) -> Result<bool> {
        scope_exists(&self.db, judge_id, segment_id, scope).await
    }

    /// 评委在该环节已锁定的选手
    pub async fn locked_candidate_ids_impl(
        &self,
        judge_id: i64,
        segment_id: i64,
    ) -> Result<Vec<i64>> {
        let mut ids: Vec<i64> = Scores::find()
            .select_only()
            .column(Column::CandidateId)
            .distinct()
            .filter(Column::JudgeId.eq(judge_id))
            .filter(Column::SegmentId.eq(segment_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询锁定选手失败: {e}")))?;

        ids.sort_unstable();
        Ok(ids)
    }

    /// 评委已提交过评分的环节
    pub async fn submitted_segment_ids_impl(&self, judge_id: i64) -> Result<Vec<i64>> {
        let mut ids: Vec<i64> = Scores::find()
            .select_only()
            .column(Column::SegmentId)
            .distinct()
            .filter(Column::JudgeId.eq(judge_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询已提交环节失败: {e}")))?;

        ids.sort_unstable();
        Ok(ids)
    }

    /// 环节内所有 (评委, 选手) 锁定对
    pub async fn segment_lock_pairs_impl(&self, segment_id: i64) -> Result<Vec<(i64, i64)>> {
        let mut pairs: Vec<(i64, i64)> = Scores::find()
            .select_only()
            .column(Column::JudgeId)
            .column(Column::CandidateId)
            .distinct()
            .filter(Column::SegmentId.eq(segment_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询评审进度失败: {e}")))?;

        pairs.sort_unstable();
        Ok(pairs)
    }

    /// 解锁：硬删除评委在该范围内的所有评分
    pub async fn delete_scores_impl(
        &self,
        judge_id: i64,
        segment_id: i64,
        scope: LockScope,
    ) -> Result<u64> {
        let mut delete = Scores::delete_many()
            .filter(Column::JudgeId.eq(judge_id))
            .filter(Column::SegmentId.eq(segment_id));
        if let Some(candidate_id) = scope.candidate_id() {
            delete = delete.filter(Column::CandidateId.eq(candidate_id));
        }

        let result = delete
            .exec(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("删除评分失败: {e}")))?;

        Ok(result.rows_affected)
    }

    /// 管理端评分列表
    pub async fn list_scores_impl(&self, query: ScoreListQuery) -> Result<Vec<ScoreListItem>> {
        let mut select = Scores::find();
        if let Some(contest_id) = query.contest_id {
            select = select.filter(Column::ContestId.eq(contest_id));
        }
        if let Some(segment_id) = query.segment_id {
            select = select.filter(Column::SegmentId.eq(segment_id));
        }
        if let Some(judge_id) = query.judge_id {
            select = select.filter(Column::JudgeId.eq(judge_id));
        }

        let scores = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询评分列表失败: {e}")))?;

        if scores.is_empty() {
            return Ok(Vec::new());
        }

        let ids = |f: fn(&crate::entity::scores::Model) -> i64| -> Vec<i64> {
            let mut ids: Vec<i64> = scores.iter().map(f).collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };

        let judges: HashMap<i64, String> = Users::find()
            .filter(users::Column::Id.is_in(ids(|s| s.judge_id)))
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询评委失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        let candidates: HashMap<i64, candidates::Model> = Candidates::find()
            .filter(candidates::Column::Id.is_in(ids(|s| s.candidate_id)))
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询选手失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let criteria: HashMap<i64, String> = Criteria::find()
            .filter(criteria::Column::Id.is_in(ids(|s| s.criterion_id)))
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询评分细则失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let segments: HashMap<i64, String> = Segments::find()
            .filter(segments::Column::Id.is_in(ids(|s| s.segment_id)))
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询环节失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let contests: HashMap<i64, String> = Contests::find()
            .filter(contests::Column::Id.is_in(ids(|s| s.contest_id)))
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询比赛失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let mut items: Vec<(i64, i64, ScoreListItem)> = scores
            .into_iter()
            .filter_map(|score| {
                let candidate = candidates.get(&score.candidate_id)?;
                Some((
                    score.contest_id,
                    score.segment_id,
                    ScoreListItem {
                        id: score.id,
                        contest_name: contests.get(&score.contest_id)?.clone(),
                        segment_name: segments.get(&score.segment_id)?.clone(),
                        candidate_number: candidate.candidate_number,
                        candidate_name: candidate.name.clone(),
                        criterion_name: criteria.get(&score.criterion_id)?.clone(),
                        judge_username: judges.get(&score.judge_id)?.clone(),
                        score: score.score,
                        created_at: crate::entity::timestamp_to_datetime(score.created_at),
                    },
                ))
            })
            .collect();

        // 比赛 → 环节 → 选手编号 → 评委，同组内保持写入顺序
        items.sort_by(|a, b| {
            (a.0, a.1, a.2.candidate_number, &a.2.judge_username).cmp(&(
                b.0,
                b.1,
                b.2.candidate_number,
                &b.2.judge_username,
            ))
        });

        Ok(items.into_iter().map(|(_, _, item)| item).collect())
    }

    /// 评委在某环节提交的评分
    pub async fn list_judge_scores_impl(
        &self,
        judge_id: i64,
        segment_id: i64,
    ) -> Result<Vec<MyScoreItem>> {
        let scores = scope_filter(judge_id, segment_id, LockScope::Segment)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询评分失败: {e}")))?;

        if scores.is_empty() {
            return Ok(Vec::new());
        }

        let candidate_ids: Vec<i64> = scores.iter().map(|s| s.candidate_id).collect();
        let candidates: HashMap<i64, candidates::Model> = Candidates::find()
            .filter(candidates::Column::Id.is_in(candidate_ids))
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询选手失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let criteria: HashMap<i64, String> = Criteria::find()
            .filter(criteria::Column::SegmentId.eq(segment_id))
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询评分细则失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let mut items: Vec<MyScoreItem> = scores
            .into_iter()
            .filter_map(|score| {
                let candidate = candidates.get(&score.candidate_id)?;
                Some(MyScoreItem {
                    candidate_id: score.candidate_id,
                    candidate_number: candidate.candidate_number,
                    candidate_name: candidate.name.clone(),
                    criterion_id: score.criterion_id,
                    criterion_name: criteria.get(&score.criterion_id)?.clone(),
                    score: score.score,
                })
            })
            .collect();

        items.sort_by_key(|item| (item.candidate_number, item.criterion_id));
        Ok(items)
    }

    /// 评分总行数
    pub async fn count_scores_impl(&self) -> Result<u64> {
        Scores::find()
            .count(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询评分总数失败: {e}")))
    }

    /// 最近一次写入的评分
    pub async fn latest_score_event_impl(&self) -> Result<Option<LastScoreEvent>> {
        let Some(score) = Scores::find()
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询最新评分失败: {e}")))?
        else {
            return Ok(None);
        };

        let judge = Users::find_by_id(score.judge_id)
            .one(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询评委失败: {e}")))?;
        let candidate = Candidates::find_by_id(score.candidate_id)
            .one(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询选手失败: {e}")))?;

        Ok(match (judge, candidate) {
            (Some(judge), Some(candidate)) => Some(LastScoreEvent {
                judge_name: judge.username,
                candidate_name: candidate.name,
                score: score.score,
                submitted_at: crate::entity::timestamp_to_datetime(score.created_at),
            }),
            _ => None,
        })
    }
}
