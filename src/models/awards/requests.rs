use serde::Deserialize;
use ts_rs::TS;

use super::entities::NewAward;
use crate::models::common::lenient::deserialize_string_to_i64;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/award.ts")]
pub struct CreateAwardRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub award_type: String,
}

impl CreateAwardRequest {
    /// 去除首尾空白，类型统一小写；名称或类型为空时返回 None
    pub fn normalized(&self) -> Option<NewAward> {
        let name = self.name.trim();
        let award_type = self.award_type.trim().to_lowercase();
        if name.is_empty() || award_type.is_empty() {
            return None;
        }
        Some(NewAward {
            name: name.to_string(),
            award_type,
        })
    }
}

// 表单提交的 ID 可能是字符串
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/award.ts")]
pub struct AssignWinnerRequest {
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub award_id: i64,
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    pub candidate_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_trims_and_lowercases_type() {
        let req = CreateAwardRequest {
            name: "  Best in Talent ".to_string(),
            award_type: " Major".to_string(),
        };
        let award = req.normalized().unwrap();
        assert_eq!(award.name, "Best in Talent");
        assert_eq!(award.award_type, "major");
    }

    #[test]
    fn test_blank_fields_are_rejected() {
        let req = CreateAwardRequest {
            name: "   ".to_string(),
            award_type: "minor".to_string(),
        };
        assert!(req.normalized().is_none());
    }

    #[test]
    fn test_form_payload_accepts_string_ids() {
        let req: AssignWinnerRequest =
            serde_json::from_str(r#"{"award_id":"3","candidate_id":"12"}"#).unwrap();
        assert_eq!((req.award_id, req.candidate_id), (3, 12));

        let req: CreateAwardRequest =
            serde_json::from_str(r#"{"name":"Miss Photogenic","type":"minor"}"#).unwrap();
        assert_eq!(req.award_type, "minor");
    }
}
