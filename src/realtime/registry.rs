//! 连接注册表
//!
//! 每个 WebSocket 连接对应一个有界发送队列。推送使用 `try_send`，
//! 队列已满的连接会丢弃本条消息，客户端重连后通过 REST 接口对齐状态。

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{Result, TabulationError};
use crate::models::kpi::responses::ActiveUser;
use crate::models::users::entities::UserRole;

use super::messages::ServerEvent;

/// 已序列化的帧，多个连接共享同一份数据
pub type Frame = Arc<str>;

/// 通过 client_auth 绑定到连接上的身份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedUser {
    pub user_id: i64,
    pub username: String,
    pub role: UserRole,
    pub session_id: String,
}

struct Connection {
    sender: mpsc::Sender<Frame>,
    user: Option<ConnectedUser>,
}

pub struct ConnectionRegistry {
    connections: DashMap<Uuid, Connection>,
    capacity: usize,
}

impl ConnectionRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            connections: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// 注册新连接，返回连接 ID 和接收端
    pub fn register(&self) -> (Uuid, mpsc::Receiver<Frame>) {
        let (sender, receiver) = mpsc::channel(self.capacity);
        let id = Uuid::new_v4();
        self.connections.insert(id, Connection { sender, user: None });
        debug!("Realtime connection registered: {}", id);
        (id, receiver)
    }

    /// 移除连接，返回其绑定的身份
    pub fn unregister(&self, id: Uuid) -> Option<ConnectedUser> {
        self.connections
            .remove(&id)
            .and_then(|(_, connection)| connection.user)
    }

    /// 为连接绑定身份，连接不存在时返回 false
    pub fn authenticate(&self, id: Uuid, user: ConnectedUser) -> bool {
        match self.connections.get_mut(&id) {
            Some(mut connection) => {
                connection.user = Some(user);
                true
            }
            None => false,
        }
    }

    pub fn user_of(&self, id: Uuid) -> Option<ConnectedUser> {
        self.connections.get(&id).and_then(|c| c.user.clone())
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// 在线用户（按用户去重，排序稳定）
    pub fn active_users(&self) -> Vec<ActiveUser> {
        let mut users: Vec<(i64, ActiveUser)> = self
            .connections
            .iter()
            .filter_map(|entry| {
                entry
                    .user
                    .as_ref()
                    .map(|u| (u.user_id, ActiveUser::new(u.username.clone(), &u.role)))
            })
            .collect();
        users.sort();
        users.dedup_by_key(|(id, _)| *id);

        let mut users: Vec<ActiveUser> = users.into_iter().map(|(_, u)| u).collect();
        users.sort();
        users
    }

    /// 推送给所有连接，返回成功入队的数量
    pub fn broadcast(&self, event: &ServerEvent) -> Result<usize> {
        self.send_where(event, |_| true)
    }

    /// 仅推送给管理员与超级管理员
    pub fn send_to_admins(&self, event: &ServerEvent) -> Result<usize> {
        self.send_where(event, |user| user.is_some_and(|u| u.role.is_admin()))
    }

    /// 推送给单个连接
    pub fn send_to(&self, id: Uuid, event: &ServerEvent) -> Result<bool> {
        let frame = Self::encode(event)?;
        Ok(self
            .connections
            .get(&id)
            .is_some_and(|c| Self::deliver(id, &c.sender, &frame, event)))
    }

    /// 通知旧会话下线，并解除这些连接的身份绑定
    pub fn force_logout_session(&self, session_id: &str, reason: &str) -> Result<usize> {
        let event = ServerEvent::ForceLogout {
            reason: reason.to_string(),
        };
        let frame = Self::encode(&event)?;

        let mut delivered = 0;
        for mut entry in self.connections.iter_mut() {
            let matches = entry
                .user
                .as_ref()
                .is_some_and(|u| u.session_id == session_id);
            if matches {
                if Self::deliver(*entry.key(), &entry.sender, &frame, &event) {
                    delivered += 1;
                }
                entry.user = None;
            }
        }
        Ok(delivered)
    }

    fn send_where<F>(&self, event: &ServerEvent, predicate: F) -> Result<usize>
    where
        F: Fn(Option<&ConnectedUser>) -> bool,
    {
        let frame = Self::encode(event)?;
        Ok(self
            .connections
            .iter()
            .filter(|entry| predicate(entry.user.as_ref()))
            .filter(|entry| Self::deliver(*entry.key(), &entry.sender, &frame, event))
            .count())
    }

    fn encode(event: &ServerEvent) -> Result<Frame> {
        serde_json::to_string(event)
            .map(Frame::from)
            .map_err(|e| TabulationError::realtime(format!("事件序列化失败: {e}")))
    }

    fn deliver(id: Uuid, sender: &mpsc::Sender<Frame>, frame: &Frame, event: &ServerEvent) -> bool {
        match sender.try_send(frame.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(
                    "Realtime queue full for connection {}, dropping {}",
                    id,
                    event.name()
                );
                false
            }
            // 连接已关闭，由会话循环负责注销
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, role: UserRole, session: &str) -> ConnectedUser {
        ConnectedUser {
            user_id: id,
            username: format!("user{id}"),
            role,
            session_id: session.to_string(),
        }
    }

    #[test]
    fn test_broadcast_reaches_every_connection() {
        let registry = ConnectionRegistry::new(8);
        let (_, mut rx1) = registry.register();
        let (_, mut rx2) = registry.register();

        let delivered = registry
            .broadcast(&ServerEvent::JudgingProgressUpdated)
            .unwrap();
        assert_eq!(delivered, 2);
        assert_eq!(
            &*rx1.try_recv().unwrap(),
            r#"{"event":"judging_progress_updated"}"#
        );
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn test_admin_only_delivery() {
        let registry = ConnectionRegistry::new(8);
        let (judge_conn, mut judge_rx) = registry.register();
        let (admin_conn, mut admin_rx) = registry.register();
        let (_anon, mut anon_rx) = registry.register();
        registry.authenticate(judge_conn, user(1, UserRole::Judge, "s1"));
        registry.authenticate(admin_conn, user(2, UserRole::Superadmin, "s2"));

        let delivered = registry.send_to_admins(&ServerEvent::Pong).unwrap();
        assert_eq!(delivered, 1);
        assert!(admin_rx.try_recv().is_ok());
        assert!(judge_rx.try_recv().is_err());
        assert!(anon_rx.try_recv().is_err());
    }

    #[test]
    fn test_full_queue_drops_without_blocking() {
        let registry = ConnectionRegistry::new(1);
        let (_, mut rx) = registry.register();
        assert_eq!(registry.broadcast(&ServerEvent::Pong).unwrap(), 1);
        assert_eq!(registry.broadcast(&ServerEvent::Pong).unwrap(), 0);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_active_users_deduplicated() {
        let registry = ConnectionRegistry::new(4);
        let (a, _rx_a) = registry.register();
        let (b, _rx_b) = registry.register();
        let (c, _rx_c) = registry.register();
        registry.authenticate(a, user(1, UserRole::Judge, "s1"));
        registry.authenticate(b, user(1, UserRole::Judge, "s1"));
        registry.authenticate(c, user(2, UserRole::Admin, "s2"));

        let users = registry.active_users();
        assert_eq!(users.len(), 2);
        assert_eq!(registry.connection_count(), 3);

        assert_eq!(registry.unregister(c).map(|u| u.user_id), Some(2));
        assert_eq!(registry.active_users().len(), 1);
    }

    #[test]
    fn test_force_logout_targets_session() {
        let registry = ConnectionRegistry::new(4);
        let (old, mut old_rx) = registry.register();
        let (other, mut other_rx) = registry.register();
        registry.authenticate(old, user(1, UserRole::Judge, "old-session"));
        registry.authenticate(other, user(3, UserRole::Judge, "another"));

        let delivered = registry
            .force_logout_session("old-session", "Logged in elsewhere")
            .unwrap();
        assert_eq!(delivered, 1);
        assert!(old_rx.try_recv().unwrap().contains("force_logout"));
        assert!(other_rx.try_recv().is_err());
        assert!(registry.user_of(old).is_none());
    }
}
