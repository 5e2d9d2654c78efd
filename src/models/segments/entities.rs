use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::ScoringStatus;

// 环节类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/segment.ts")]
pub enum SegmentType {
    Judge, // 评委按评分细则打分
    Admin, // 管理员直接录入
}

impl SegmentType {
    pub const JUDGE: &'static str = "judge";
    pub const ADMIN: &'static str = "admin";
}

impl<'de> Deserialize<'de> for SegmentType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<SegmentType>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid segment type: '{s}'. Supported types: judge, admin"
            ))
        })
    }
}

impl std::fmt::Display for SegmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentType::Judge => write!(f, "{}", SegmentType::JUDGE),
            SegmentType::Admin => write!(f, "{}", SegmentType::ADMIN),
        }
    }
}

impl std::str::FromStr for SegmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SegmentType::JUDGE => Ok(SegmentType::Judge),
            SegmentType::ADMIN => Ok(SegmentType::Admin),
            _ => Err(format!("Invalid segment type: {s}")),
        }
    }
}

// 环节实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/segment.ts")]
pub struct Segment {
    pub id: i64,
    pub contest_id: i64,
    pub name: String,
    /// 在比赛总分中的权重（0-100）
    pub percentage: f64,
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    pub status: ScoringStatus,
}

impl Segment {
    /// 评委当前可以打分
    pub fn is_open_for_judges(&self) -> bool {
        self.segment_type == SegmentType::Judge && self.status.is_open()
    }
}
