use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 评分细则
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/criterion.ts")]
pub struct Criterion {
    pub id: i64,
    pub segment_id: i64,
    pub name: String,
    /// 该细则的满分，同时也是它在环节内的权重
    pub max_score: f64,
}
