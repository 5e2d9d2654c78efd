use super::SeaOrmStorage;
use crate::entity::segments::{ActiveModel, Column, Entity as Segments};
use crate::errors::{Result, TabulationError};
use crate::models::common::ScoringStatus;
use crate::models::segments::{entities::Segment, requests::CreateSegmentRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建环节
    pub async fn create_segment_impl(&self, req: CreateSegmentRequest) -> Result<Segment> {
        let model = ActiveModel {
            contest_id: Set(req.contest_id),
            name: Set(req.name),
            percentage: Set(req.percentage),
            segment_type: Set(req.segment_type.to_string()),
            status: Set(req.status.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("创建环节失败: {e}")))?;

        Ok(result.into_segment())
    }

    /// 通过 ID 获取环节
    pub async fn get_segment_by_id_impl(&self, id: i64) -> Result<Option<Segment>> {
        let result = Segments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询环节失败: {e}")))?;

        Ok(result.map(|m| m.into_segment()))
    }

    /// 列出比赛的所有环节
    pub async fn list_segments_by_contest_impl(&self, contest_id: i64) -> Result<Vec<Segment>> {
        let result = Segments::find()
            .filter(Column::ContestId.eq(contest_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询环节列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_segment()).collect())
    }

    /// 更新环节状态
    pub async fn update_segment_status_impl(
        &self,
        id: i64,
        status: ScoringStatus,
    ) -> Result<Option<Segment>> {
        let Some(existing) = Segments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询环节失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        active.status = Set(status.to_string());
        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("更新环节状态失败: {e}")))?;

        Ok(Some(updated.into_segment()))
    }

    /// 删除环节（级联删除细则、评分与管理员得分）
    pub async fn delete_segment_impl(&self, id: i64) -> Result<bool> {
        let result = Segments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("删除环节失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
