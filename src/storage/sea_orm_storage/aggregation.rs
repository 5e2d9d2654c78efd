//! 汇总数据加载
//!
//! 在一个只读事务内读取全部已提交数据，保证各表快照一致。

use super::SeaOrmStorage;
use crate::entity::prelude::{AdminScores, Candidates, Contests, Scores, Segments};
use crate::entity::scores;
use crate::errors::{Result, TabulationError};
use crate::tabulation::{AdminScoreRecord, AggregationInput, JudgeScoreRecord};
use sea_orm::{EntityTrait, QueryOrder, QuerySelect, TransactionTrait};

impl SeaOrmStorage {
    pub async fn load_aggregation_input_impl(&self) -> Result<AggregationInput> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TabulationError::database_operation(format!("开启事务失败: {e}")))?;

        let contests = Contests::find()
            .all(&txn)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询比赛失败: {e}")))?;

        let candidates = Candidates::find()
            .order_by_asc(crate::entity::candidates::Column::Id)
            .all(&txn)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询选手失败: {e}")))?;

        let segments = Segments::find()
            .all(&txn)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询环节失败: {e}")))?;

        let judge_scores: Vec<(i64, i64, i64, f64)> = Scores::find()
            .select_only()
            .column(scores::Column::JudgeId)
            .column(scores::Column::CandidateId)
            .column(scores::Column::SegmentId)
            .column(scores::Column::Score)
            .into_tuple()
            .all(&txn)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询评分失败: {e}")))?;

        let admin_scores = AdminScores::find()
            .all(&txn)
            .await
            .map_err(|e| {
                TabulationError::database_operation(format!("查询管理员得分失败: {e}"))
            })?;

        txn.commit()
            .await
            .map_err(|e| TabulationError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(AggregationInput {
            contests: contests.into_iter().map(|m| m.into_contest()).collect(),
            candidates: candidates.into_iter().map(|m| m.into_candidate()).collect(),
            segments: segments.into_iter().map(|m| m.into_segment()).collect(),
            judge_scores: judge_scores
                .into_iter()
                .map(|(judge_id, candidate_id, segment_id, score)| JudgeScoreRecord {
                    judge_id,
                    candidate_id,
                    segment_id,
                    score,
                })
                .collect(),
            admin_scores: admin_scores
                .into_iter()
                .map(|m| AdminScoreRecord {
                    candidate_id: m.candidate_id,
                    segment_id: m.segment_id,
                    score: m.score,
                })
                .collect(),
        })
    }
}
