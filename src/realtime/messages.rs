//! WebSocket 消息格式
//!
//! 所有帧均为 JSON：`{"event": "<name>", "data": ...}`，无负载的事件省略 `data`。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::ScoringStatus;
use crate::models::kpi::responses::KpiDigest;
use crate::tabulation::Leaderboards;

/// 服务端推送事件
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/realtime.ts")]
pub enum ServerEvent {
    /// 连接建立
    Connected { connection_id: String },
    /// 分组排行榜
    UpdateResults(Leaderboards),
    /// 管理端概览，仅推送给管理员连接
    KpiUpdate(KpiDigest),
    /// 评委端需要重新拉取环节/选手列表
    JudgingProgressUpdated,
    CandidateStatusChanged {
        contest_id: i64,
        candidate_id: Option<i64>,
        status: Option<ScoringStatus>,
    },
    SegmentStatusChanged {
        contest_id: i64,
        segment_id: i64,
        status: ScoringStatus,
    },
    ScoresUnlocked {
        judge_id: i64,
        segment_id: i64,
        candidate_id: Option<i64>,
    },
    /// 同一账号在别处登录
    ForceLogout { reason: String },
    Error { message: String },
    Pong,
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Connected { .. } => "connected",
            ServerEvent::UpdateResults(_) => "update_results",
            ServerEvent::KpiUpdate(_) => "kpi_update",
            ServerEvent::JudgingProgressUpdated => "judging_progress_updated",
            ServerEvent::CandidateStatusChanged { .. } => "candidate_status_changed",
            ServerEvent::SegmentStatusChanged { .. } => "segment_status_changed",
            ServerEvent::ScoresUnlocked { .. } => "scores_unlocked",
            ServerEvent::ForceLogout { .. } => "force_logout",
            ServerEvent::Error { .. } => "error",
            ServerEvent::Pong => "pong",
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error {
            message: message.into(),
        }
    }
}

/// 客户端发送的事件
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/realtime.ts")]
pub enum ClientEvent {
    /// 为连接绑定身份
    ClientAuth { token: String },
    Ping,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_events_have_no_data() {
        let json = serde_json::to_string(&ServerEvent::JudgingProgressUpdated).unwrap();
        assert_eq!(json, r#"{"event":"judging_progress_updated"}"#);
    }

    #[test]
    fn test_event_name_matches_wire_tag() {
        let event = ServerEvent::ScoresUnlocked {
            judge_id: 1,
            segment_id: 2,
            candidate_id: None,
        };
        let value: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], event.name());
        assert_eq!(value["data"]["segment_id"], 2);
    }

    #[test]
    fn test_parse_client_events() {
        let auth: ClientEvent =
            serde_json::from_str(r#"{"event":"client_auth","data":{"token":"abc"}}"#).unwrap();
        assert!(matches!(auth, ClientEvent::ClientAuth { token } if token == "abc"));

        let ping: ClientEvent = serde_json::from_str(r#"{"event":"ping"}"#).unwrap();
        assert!(matches!(ping, ClientEvent::Ping));

        assert!(serde_json::from_str::<ClientEvent>(r#"{"event":"shutdown"}"#).is_err());
    }
}
