//! 选手实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "candidates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub contest_id: i64,
    pub name: String,
    pub candidate_number: i32,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
    pub status: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contests::Entity",
        from = "Column::ContestId",
        to = "super::contests::Column::Id"
    )]
    Contest,
    #[sea_orm(has_many = "super::scores::Entity")]
    Scores,
    #[sea_orm(has_many = "super::admin_scores::Entity")]
    AdminScores,
}

impl Related<super::contests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contest.def()
    }
}

impl Related<super::scores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scores.def()
    }
}

impl Related<super::admin_scores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdminScores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_candidate(self) -> crate::models::candidates::entities::Candidate {
        use crate::models::ScoringStatus;
        use crate::models::candidates::entities::Candidate;

        Candidate {
            id: self.id,
            contest_id: self.contest_id,
            name: self.name,
            candidate_number: self.candidate_number,
            image_url: self.image_url,
            display_order: self.display_order,
            status: self
                .status
                .parse::<ScoringStatus>()
                .unwrap_or(ScoringStatus::Closed),
        }
    }
}
