//! 排行榜推送
//!
//! 每次影响分数的操作完成后重新读取全部数据并计算，不缓存中间结果。
//! 重算失败只记录日志，不影响触发它的请求。

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::errors::Result;
use crate::models::AppStartTime;
use crate::models::kpi::responses::KpiDigest;
use crate::storage::Storage;
use crate::tabulation::{Leaderboards, aggregate, build_leaderboards};

use super::messages::ServerEvent;
use super::registry::ConnectionRegistry;

#[derive(Clone)]
pub struct RankingBroadcaster {
    registry: Arc<ConnectionRegistry>,
    storage: Arc<dyn Storage>,
    precision: u32,
    started: AppStartTime,
    // 串行化“计算 + 推送”，保证客户端最后收到的是最新结果
    publish_lock: Arc<Mutex<()>>,
}

impl RankingBroadcaster {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        storage: Arc<dyn Storage>,
        precision: u32,
        started: AppStartTime,
    ) -> Self {
        Self {
            registry,
            storage,
            precision,
            started,
            publish_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// 读取已提交数据并计算分组排行榜
    pub async fn current_leaderboards(&self) -> Result<Leaderboards> {
        let input = self.storage.load_aggregation_input().await?;
        Ok(build_leaderboards(aggregate(&input, self.precision)))
    }

    /// 重算并推送给所有连接，失败时仅记录日志
    pub async fn publish_results(&self) {
        let _guard = self.publish_lock.lock().await;
        match self.current_leaderboards().await {
            Ok(boards) => match self.registry.broadcast(&ServerEvent::UpdateResults(boards)) {
                Ok(delivered) => debug!("update_results delivered to {} connection(s)", delivered),
                Err(e) => error!("Failed to broadcast results: {}", e),
            },
            Err(e) => error!("Failed to recompute results: {}", e),
        }
    }

    /// 当前 KPI 概览
    pub async fn kpi_digest(&self) -> Result<KpiDigest> {
        let total_scores_submitted = self.storage.count_scores().await?;
        let last_score = self.storage.latest_score_event().await?;

        Ok(KpiDigest {
            connection_count: self.registry.connection_count(),
            active_users: self.registry.active_users(),
            total_scores_submitted,
            last_score,
            server_uptime: self.started.uptime_seconds(),
        })
    }

    /// 推送 KPI 给管理员连接，失败时仅记录日志
    pub async fn publish_kpis(&self) {
        match self.kpi_digest().await {
            Ok(digest) => {
                if let Err(e) = self.registry.send_to_admins(&ServerEvent::KpiUpdate(digest)) {
                    error!("Failed to push KPI digest: {}", e);
                }
            }
            Err(e) => error!("Failed to compute KPI digest: {}", e),
        }
    }

    /// 评分写入或删除之后：重算排行榜、通知评委端刷新、更新管理端 KPI
    pub async fn scores_changed(&self) {
        self.publish_results().await;
        self.signal(ServerEvent::JudgingProgressUpdated);
        self.publish_kpis().await;
    }

    /// 推送无需重算的信号事件
    pub fn signal(&self, event: ServerEvent) {
        if let Err(e) = self.registry.broadcast(&event) {
            error!("Failed to broadcast {}: {}", event.name(), e);
        }
    }
}
