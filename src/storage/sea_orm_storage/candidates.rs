use super::SeaOrmStorage;
use crate::entity::candidates::{ActiveModel, Column, Entity as Candidates};
use crate::errors::{Result, TabulationError};
use crate::models::candidates::{
    entities::Candidate,
    requests::{CandidateOrderUpdate, CreateCandidateRequest},
};
use crate::models::common::ScoringStatus;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建选手
    pub async fn create_candidate_impl(&self, req: CreateCandidateRequest) -> Result<Candidate> {
        let model = ActiveModel {
            contest_id: Set(req.contest_id),
            name: Set(req.name),
            candidate_number: Set(req.candidate_number),
            image_url: Set(req.image_url),
            display_order: Set(req.display_order),
            status: Set(req.status.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("创建选手失败: {e}")))?;

        Ok(result.into_candidate())
    }

    /// 通过 ID 获取选手
    pub async fn get_candidate_by_id_impl(&self, id: i64) -> Result<Option<Candidate>> {
        let result = Candidates::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询选手失败: {e}")))?;

        Ok(result.map(|m| m.into_candidate()))
    }

    /// 批量获取选手
    pub async fn get_candidates_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Candidate>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Candidates::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询选手失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_candidate()).collect())
    }

    /// 按展示顺序列出比赛选手
    pub async fn list_candidates_by_contest_impl(
        &self,
        contest_id: i64,
        open_only: bool,
    ) -> Result<Vec<Candidate>> {
        let mut select = Candidates::find().filter(Column::ContestId.eq(contest_id));
        if open_only {
            select = select.filter(Column::Status.eq(ScoringStatus::OPEN));
        }

        let result = select
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询选手列表失败: {e}")))?;

        // NULL 排序在不同数据库中不一致，统一在内存中排序
        let mut candidates: Vec<Candidate> =
            result.into_iter().map(|m| m.into_candidate()).collect();
        Candidate::sort_for_display(&mut candidates);
        Ok(candidates)
    }

    /// 更新单个选手状态
    pub async fn update_candidate_status_impl(
        &self,
        id: i64,
        status: ScoringStatus,
    ) -> Result<Option<Candidate>> {
        let Some(existing) = Candidates::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询选手失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        active.status = Set(status.to_string());
        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("更新选手状态失败: {e}")))?;

        Ok(Some(updated.into_candidate()))
    }

    /// 批量设置比赛内所有选手的状态
    pub async fn update_contest_candidates_status_impl(
        &self,
        contest_id: i64,
        status: ScoringStatus,
    ) -> Result<u64> {
        let result = Candidates::update_many()
            .col_expr(Column::Status, Expr::value(status.to_string()))
            .filter(Column::ContestId.eq(contest_id))
            .exec(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("更新选手状态失败: {e}")))?;

        Ok(result.rows_affected)
    }

    /// 批量更新展示顺序与状态，任一失败则整体回滚
    pub async fn batch_update_candidates_impl(
        &self,
        updates: Vec<CandidateOrderUpdate>,
    ) -> Result<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TabulationError::database_operation(format!("开启事务失败: {e}")))?;

        let mut affected = 0;
        for update in updates {
            let result = Candidates::update_many()
                .col_expr(Column::DisplayOrder, Expr::value(update.display_order))
                .col_expr(Column::Status, Expr::value(update.status.to_string()))
                .filter(Column::Id.eq(update.id))
                .exec(&txn)
                .await
                .map_err(|e| {
                    TabulationError::database_operation(format!("批量更新选手失败: {e}"))
                })?;
            affected += result.rows_affected;
        }

        txn.commit()
            .await
            .map_err(|e| TabulationError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(affected)
    }
}
