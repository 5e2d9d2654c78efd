//! 奖项与获奖者存储

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::award_winners::{self, Entity as AwardWinners};
use crate::entity::awards::{ActiveModel, Column, Entity as Awards};
use crate::entity::prelude::{Candidates, Contests};
use crate::entity::{candidates, contests};
use crate::errors::{Result, TabulationError};
use crate::models::awards::{
    entities::{Award, NewAward, NewAwardWinner},
    responses::PublicWinner,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};

impl SeaOrmStorage {
    /// 创建奖项，名称重复时返回 Conflict
    pub async fn create_award_impl(&self, award: NewAward) -> Result<Award> {
        let model = ActiveModel {
            name: Set(award.name.clone()),
            award_type: Set(award.award_type),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(created) => Ok(created.into_award()),
            Err(e) => match e.sql_err() {
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => Err(
                    TabulationError::conflict(format!("Award '{}' already exists", award.name)),
                ),
                _ => Err(TabulationError::database_operation(format!(
                    "创建奖项失败: {e}"
                ))),
            },
        }
    }

    pub async fn get_award_by_id_impl(&self, id: i64) -> Result<Option<Award>> {
        let result = Awards::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询奖项失败: {e}")))?;

        Ok(result.map(|m| m.into_award()))
    }

    /// 按类型、名称列出所有奖项
    pub async fn list_awards_impl(&self) -> Result<Vec<Award>> {
        let awards = Awards::find()
            .order_by_asc(Column::AwardType)
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询奖项列表失败: {e}")))?;

        Ok(awards.into_iter().map(|m| m.into_award()).collect())
    }

    /// 删除奖项（级联删除获奖记录）
    pub async fn delete_award_impl(&self, id: i64) -> Result<bool> {
        let result = Awards::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("删除奖项失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 指定获奖者，同一奖项再次指定时覆盖
    pub async fn assign_award_winner_impl(&self, winner: NewAwardWinner) -> Result<()> {
        let model = award_winners::ActiveModel {
            award_id: Set(winner.award_id),
            candidate_id: Set(winner.candidate_id),
            assigned_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        AwardWinners::insert(model)
            .on_conflict(
                OnConflict::column(award_winners::Column::AwardId)
                    .update_columns([
                        award_winners::Column::CandidateId,
                        award_winners::Column::AssignedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("保存获奖者失败: {e}")))?;

        Ok(())
    }

    /// 公开获奖名单
    pub async fn list_public_winners_impl(&self) -> Result<Vec<PublicWinner>> {
        let winners = AwardWinners::find()
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询获奖者失败: {e}")))?;

        if winners.is_empty() {
            return Ok(Vec::new());
        }

        let award_ids: Vec<i64> = winners.iter().map(|w| w.award_id).collect();
        let candidate_ids: Vec<i64> = winners.iter().map(|w| w.candidate_id).collect();

        let awards: HashMap<i64, Award> = Awards::find()
            .filter(Column::Id.is_in(award_ids))
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询奖项失败: {e}")))?
            .into_iter()
            .map(|a| (a.id, a.into_award()))
            .collect();

        let candidates: HashMap<i64, candidates::Model> = Candidates::find()
            .filter(candidates::Column::Id.is_in(candidate_ids))
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询选手失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut contest_ids: Vec<i64> = candidates.values().map(|c| c.contest_id).collect();
        contest_ids.sort_unstable();
        contest_ids.dedup();
        let contests: HashMap<i64, String> = Contests::find()
            .filter(contests::Column::Id.is_in(contest_ids))
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询比赛失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let mut items: Vec<PublicWinner> = winners
            .into_iter()
            .filter_map(|winner| {
                let award = awards.get(&winner.award_id)?;
                let candidate = candidates.get(&winner.candidate_id)?;
                Some(PublicWinner {
                    award_id: award.id,
                    award_name: award.name.clone(),
                    award_type: award.award_type.clone(),
                    candidate_id: candidate.id,
                    candidate_name: candidate.name.clone(),
                    candidate_number: candidate.candidate_number,
                    contest_name: contests.get(&candidate.contest_id)?.clone(),
                    image_url: candidate.image_url.clone(),
                })
            })
            .collect();

        items.sort_by(|a, b| (&a.award_type, &a.award_name).cmp(&(&b.award_type, &b.award_name)));
        Ok(items)
    }
}
