use super::SeaOrmStorage;
use crate::entity::contests::{ActiveModel, Column, Entity as Contests};
use crate::errors::{Result, TabulationError};
use crate::models::contests::{entities::Contest, requests::CreateContestRequest};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建比赛
    pub async fn create_contest_impl(&self, req: CreateContestRequest) -> Result<Contest> {
        let model = ActiveModel {
            name: Set(req.name),
            image_url: Set(req.image_url),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("创建比赛失败: {e}")))?;

        Ok(result.into_contest())
    }

    /// 通过 ID 获取比赛
    pub async fn get_contest_by_id_impl(&self, id: i64) -> Result<Option<Contest>> {
        let result = Contests::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询比赛失败: {e}")))?;

        Ok(result.map(|m| m.into_contest()))
    }

    /// 列出所有比赛
    pub async fn list_contests_impl(&self) -> Result<Vec<Contest>> {
        let contests = Contests::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询比赛列表失败: {e}")))?;

        Ok(contests.into_iter().map(|m| m.into_contest()).collect())
    }

    /// 删除比赛（外键级联删除下属数据）
    pub async fn delete_contest_impl(&self, id: i64) -> Result<bool> {
        let result = Contests::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("删除比赛失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
