use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::lenient::{
    deserialize_optional_i64, deserialize_string_to_f64, deserialize_string_to_i64,
};

// 整环节提交中的一条评分
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct ScoreEntry {
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub candidate_id: i64,
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub criterion_id: i64,
    #[serde(deserialize_with = "deserialize_string_to_f64")]
    pub score: f64,
}

// 整环节提交：比赛内全部开放选手 × 该环节所有评分细则
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct SubmitSegmentScoresRequest {
    pub scores: Vec<ScoreEntry>,
}

// 单选手提交中的一条评分
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct CriterionScoreEntry {
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub criterion_id: i64,
    #[serde(deserialize_with = "deserialize_string_to_f64")]
    pub score: f64,
}

// 单选手锁定提交
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct SubmitCandidateScoresRequest {
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub segment_id: i64,
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub candidate_id: i64,
    pub scores: Vec<CriterionScoreEntry>,
}

// 管理员环节得分
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct SpecialScoreEntry {
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub candidate_id: i64,
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub segment_id: i64,
    #[serde(deserialize_with = "deserialize_string_to_f64")]
    pub score: f64,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct SaveSpecialScoresRequest {
    pub scores: Vec<SpecialScoreEntry>,
}

// 解锁评委的整环节提交
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct UnlockScoresRequest {
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub judge_id: i64,
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub segment_id: i64,
}

// 解锁评委对某位选手的提交
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct UnlockCandidateScoresRequest {
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub judge_id: i64,
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub segment_id: i64,
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub candidate_id: i64,
}

// 评分列表筛选
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreListQuery {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub contest_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub segment_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub judge_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpecialScoresQuery {
    pub contest_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JudgingStatusQuery {
    pub segment_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_submission_accepts_string_ids() {
        let req: SubmitCandidateScoresRequest = serde_json::from_str(
            r#"{"segment_id": "7", "candidate_id": 3,
                "scores": [{"criterion_id": "1", "score": "55.5"}]}"#,
        )
        .unwrap();
        assert_eq!(req.segment_id, 7);
        assert_eq!(req.scores[0].score, 55.5);
    }

    #[test]
    fn test_missing_score_rejects_whole_request() {
        let result = serde_json::from_str::<SubmitSegmentScoresRequest>(
            r#"{"scores": [
                {"candidate_id": 1, "criterion_id": 1, "score": 10},
                {"candidate_id": 1, "criterion_id": 2}
            ]}"#,
        );
        assert!(result.is_err());
    }
}
