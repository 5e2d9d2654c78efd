use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 奖项，例如 "Best in Talent"，award_type 用于公开页分组（major / minor 等）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/award.ts")]
pub struct Award {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub award_type: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 待写入的奖项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAward {
    pub name: String,
    pub award_type: String,
}

// 待写入的获奖记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAwardWinner {
    pub award_id: i64,
    pub candidate_id: i64,
}
