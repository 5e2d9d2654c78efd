use super::SeaOrmStorage;
use crate::entity::criteria::{ActiveModel, Column, Entity as Criteria};
use crate::errors::{Result, TabulationError};
use crate::models::criteria::{entities::Criterion, requests::CreateCriterionRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建评分细则
    pub async fn create_criterion_impl(&self, req: CreateCriterionRequest) -> Result<Criterion> {
        let model = ActiveModel {
            segment_id: Set(req.segment_id),
            name: Set(req.name),
            max_score: Set(req.max_score),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("创建评分细则失败: {e}")))?;

        Ok(result.into_criterion())
    }

    /// 列出环节的评分细则
    pub async fn list_criteria_by_segment_impl(&self, segment_id: i64) -> Result<Vec<Criterion>> {
        let result = Criteria::find()
            .filter(Column::SegmentId.eq(segment_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询评分细则失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_criterion()).collect())
    }

    /// 批量获取评分细则
    pub async fn get_criteria_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Criterion>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Criteria::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询评分细则失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_criterion()).collect())
    }
}
