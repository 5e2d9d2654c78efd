use serde::Serialize;
use ts_rs::TS;

use crate::models::users::entities::UserRole;

// 在线用户
#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/kpi.ts")]
pub struct ActiveUser {
    pub username: String,
    pub role: String,
}

impl ActiveUser {
    pub fn new(username: impl Into<String>, role: &UserRole) -> Self {
        Self {
            username: username.into(),
            role: role.to_string(),
        }
    }
}

// 最近一次评分事件
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/kpi.ts")]
pub struct LastScoreEvent {
    pub judge_name: String,
    pub candidate_name: String,
    pub score: f64,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

// 管理端实时概览
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/kpi.ts")]
pub struct KpiDigest {
    pub connection_count: usize,
    pub active_users: Vec<ActiveUser>,
    pub total_scores_submitted: u64,
    pub last_score: Option<LastScoreEvent>,
    /// 服务运行秒数
    pub server_uptime: i64,
}
