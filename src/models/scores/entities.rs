use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 管理员环节得分，每个 (选手, 环节) 只保留一条
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/score.ts")]
pub struct AdminScore {
    pub id: i64,
    pub candidate_id: i64,
    pub segment_id: i64,
    pub contest_id: i64,
    pub score: f64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 已通过校验、待写入的评分行，所有外键均由服务端推导
#[derive(Debug, Clone, PartialEq)]
pub struct NewScore {
    pub judge_id: i64,
    pub candidate_id: i64,
    pub criterion_id: i64,
    pub segment_id: i64,
    pub contest_id: i64,
    pub score: f64,
}

/// 已通过校验、待写入的管理员得分
#[derive(Debug, Clone, PartialEq)]
pub struct NewAdminScore {
    pub candidate_id: i64,
    pub segment_id: i64,
    pub contest_id: i64,
    pub score: f64,
}

/// 锁定范围：整个环节，或环节内的某位选手
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockScope {
    Segment,
    Candidate(i64),
}

impl LockScope {
    pub fn candidate_id(&self) -> Option<i64> {
        match self {
            LockScope::Segment => None,
            LockScope::Candidate(id) => Some(*id),
        }
    }
}
