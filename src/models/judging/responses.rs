use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::models::candidates::entities::Candidate;
use crate::models::common::ScoringStatus;
use crate::models::segments::entities::SegmentType;

// 评委端环节列表
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/judging.ts")]
pub struct JudgeSegmentItem {
    pub id: i64,
    pub contest_id: i64,
    pub name: String,
    pub percentage: f64,
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    pub status: ScoringStatus,
    /// 该评委是否已在此环节提交过评分
    pub submitted: bool,
}

// 评委端选手列表
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/judging.ts")]
pub struct JudgeCandidateItem {
    pub id: i64,
    pub name: String,
    pub candidate_number: i32,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
    /// 该评委是否已锁定此选手
    pub locked: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/judging.ts")]
pub struct LockedCandidatesResponse {
    pub candidate_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/judging.ts")]
pub struct JudgeSummary {
    pub id: i64,
    pub username: String,
}

// 管理端评审进度表，locked_map 的键为 "judge_id:candidate_id"
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/judging.ts")]
pub struct JudgingStatusResponse {
    pub judges: Vec<JudgeSummary>,
    pub candidates: Vec<Candidate>,
    pub locked_map: BTreeMap<String, bool>,
}

impl JudgingStatusResponse {
    pub fn lock_key(judge_id: i64, candidate_id: i64) -> String {
        format!("{judge_id}:{candidate_id}")
    }
}
