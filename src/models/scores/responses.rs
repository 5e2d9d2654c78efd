use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::models::segments::entities::Segment;

// 提交结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct SubmissionResponse {
    pub inserted: usize,
}

// 管理端评分列表的一行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct ScoreListItem {
    pub id: i64,
    pub contest_name: String,
    pub segment_name: String,
    pub candidate_number: i32,
    pub candidate_name: String,
    pub criterion_name: String,
    pub judge_username: String,
    pub score: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 评委查看自己已提交的评分
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct MyScoreItem {
    pub candidate_id: i64,
    pub candidate_number: i32,
    pub candidate_name: String,
    pub criterion_id: i64,
    pub criterion_name: String,
    pub score: f64,
}

// 管理员环节得分表格中的一行，键为环节 ID
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct SpecialScoreRow {
    pub candidate_id: i64,
    pub candidate_number: i32,
    pub name: String,
    pub scores: BTreeMap<i64, Option<f64>>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct SpecialScoresResponse {
    pub segments: Vec<Segment>,
    pub rows: Vec<SpecialScoreRow>,
}

// 解锁结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct UnlockResponse {
    pub deleted: u64,
}
