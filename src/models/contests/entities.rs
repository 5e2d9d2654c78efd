use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 比赛实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/contest.ts")]
pub struct Contest {
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
