//! 实时推送
//!
//! - `messages`: WebSocket 帧格式（服务端事件与客户端事件）
//! - `registry`: 进程内连接注册表（连接 → 用户身份）
//! - `broadcaster`: 排行榜重算与推送、管理端 KPI 推送

pub mod broadcaster;
pub mod messages;
pub mod registry;

pub use broadcaster::RankingBroadcaster;
pub use messages::{ClientEvent, ServerEvent};
pub use registry::{ConnectedUser, ConnectionRegistry};
