use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::ScoringStatus;
use crate::models::common::lenient::deserialize_string_to_i64;

// 选手创建请求（用于存储层与初始化数据）
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCandidateRequest {
    pub contest_id: i64,
    pub name: String,
    pub candidate_number: i32,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
    pub status: ScoringStatus,
}

// 状态切换请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/candidate.ts")]
pub struct UpdateStatusRequest {
    pub status: ScoringStatus,
}

// 批量更新展示顺序与状态
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/candidate.ts")]
pub struct CandidateOrderUpdate {
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_display_order")]
    pub display_order: Option<i32>,
    pub status: ScoringStatus,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/candidate.ts")]
pub struct BatchUpdateCandidatesRequest {
    pub candidates: Vec<CandidateOrderUpdate>,
}

// 展示顺序可以是数字、数字字符串、空字符串或 null，后两者表示清除
fn deserialize_display_order<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    match raw {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom("display_order must be an integer")),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| D::Error::custom("display_order must be an integer")),
        Some(_) => Err(D::Error::custom("display_order must be an integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_update_accepts_form_values() {
        let req: BatchUpdateCandidatesRequest = serde_json::from_str(
            r#"{"candidates": [
                {"id": "4", "display_order": "2", "status": "open"},
                {"id": 5, "display_order": "", "status": "closed"},
                {"id": 6, "status": "open"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(req.candidates[0].display_order, Some(2));
        assert_eq!(req.candidates[1].display_order, None);
        assert_eq!(req.candidates[1].status, ScoringStatus::Closed);
        assert_eq!(req.candidates[2].display_order, None);
    }
}
