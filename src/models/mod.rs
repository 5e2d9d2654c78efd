pub mod auth;
pub mod awards;
pub mod candidates;
pub mod common;
pub mod contests;
pub mod criteria;
pub mod judging;
pub mod kpi;
pub mod scores;
pub mod segments;
pub mod users;

pub use common::{ApiResponse, ScoringStatus};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 进程启动时间，用于计算运行时长
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.start_datetime)
            .num_seconds()
    }
}

// 业务错误码
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[repr(i32)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证相关
    AuthFailed = 2000,
    SessionExpired = 2001,

    // 用户相关
    UserNotFound = 3000,

    // 比赛配置相关
    ContestNotFound = 4000,
    CandidateNotFound = 4001,
    SegmentNotFound = 4002,
    CriterionNotFound = 4003,
    SegmentNotOpen = 4004,
    CandidateNotOpen = 4005,
    AwardNotFound = 4006,

    // 评分相关
    ScoreValidationFailed = 5000,
    AlreadySubmitted = 5001,
}
