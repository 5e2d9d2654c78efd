//! 奖项实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "awards")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub award_type: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::award_winners::Entity")]
    AwardWinners,
}

impl Related<super::award_winners::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AwardWinners.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_award(self) -> crate::models::awards::entities::Award {
        crate::models::awards::entities::Award {
            id: self.id,
            name: self.name,
            award_type: self.award_type,
            created_at: super::timestamp_to_datetime(self.created_at),
        }
    }
}
