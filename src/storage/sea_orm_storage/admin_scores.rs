use super::SeaOrmStorage;
use crate::entity::admin_scores::{ActiveModel, Column, Entity as AdminScores};
use crate::errors::{Result, TabulationError};
use crate::models::scores::entities::{AdminScore, NewAdminScore};
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::OnConflict,
};

impl SeaOrmStorage {
    /// 按 (选手, 环节) 覆盖写入管理员得分，整批在一个事务内
    pub async fn upsert_admin_scores_impl(&self, rows: Vec<NewAdminScore>) -> Result<usize> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TabulationError::database_operation(format!("开启事务失败: {e}")))?;

        let now = chrono::Utc::now().timestamp();
        let count = rows.len();
        for row in rows {
            let model = ActiveModel {
                candidate_id: Set(row.candidate_id),
                segment_id: Set(row.segment_id),
                contest_id: Set(row.contest_id),
                score: Set(row.score),
                updated_at: Set(now),
                ..Default::default()
            };

            AdminScores::insert(model)
                .on_conflict(
                    OnConflict::columns([Column::CandidateId, Column::SegmentId])
                        .update_columns([Column::Score, Column::ContestId, Column::UpdatedAt])
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await
                .map_err(|e| {
                    TabulationError::database_operation(format!("保存管理员得分失败: {e}"))
                })?;
        }

        txn.commit()
            .await
            .map_err(|e| TabulationError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(count)
    }

    /// 列出比赛的管理员得分
    pub async fn list_admin_scores_by_contest_impl(
        &self,
        contest_id: i64,
    ) -> Result<Vec<AdminScore>> {
        let result = AdminScores::find()
            .filter(Column::ContestId.eq(contest_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                TabulationError::database_operation(format!("查询管理员得分失败: {e}"))
            })?;

        Ok(result.into_iter().map(|m| m.into_admin_score()).collect())
    }
}
