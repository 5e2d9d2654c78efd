//! 环节实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "segments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub contest_id: i64,
    pub name: String,
    pub percentage: f64,
    pub segment_type: String,
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
    #[sea_orm(has_many = "super::criteria::Entity")]
    Criteria,
    #[sea_orm(has_many = "super::admin_scores::Entity")]
    AdminScores,
}

impl Related<super::contests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contest.def()
    }
}

impl Related<super::criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Criteria.def()
    }
}

impl Related<super::admin_scores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdminScores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_segment(self) -> crate::models::segments::entities::Segment {
        use crate::models::ScoringStatus;
        use crate::models::segments::entities::{Segment, SegmentType};

        Segment {
            id: self.id,
            contest_id: self.contest_id,
            name: self.name,
            percentage: self.percentage,
            segment_type: self
                .segment_type
                .parse::<SegmentType>()
                .unwrap_or(SegmentType::Judge),
            status: self
                .status
                .parse::<ScoringStatus>()
                .unwrap_or(ScoringStatus::Closed),
        }
    }
}
