use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 开放状态：选手是否接受评分、环节是否对评委可见
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/common.ts")]
pub enum ScoringStatus {
    Open,
    Closed,
}

impl ScoringStatus {
    pub const OPEN: &'static str = "open";
    pub const CLOSED: &'static str = "closed";

    pub fn is_open(&self) -> bool {
        matches!(self, ScoringStatus::Open)
    }
}

impl std::fmt::Display for ScoringStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringStatus::Open => write!(f, "{}", ScoringStatus::OPEN),
            ScoringStatus::Closed => write!(f, "{}", ScoringStatus::CLOSED),
        }
    }
}

impl std::str::FromStr for ScoringStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ScoringStatus::OPEN => Ok(ScoringStatus::Open),
            ScoringStatus::CLOSED => Ok(ScoringStatus::Closed),
            _ => Err(format!("Invalid status: {s}")),
        }
    }
}
