//! 同一评委同一环节的提交串行化
//!
//! 数据库唯一索引是最终防线，这里让同进程内的并发提交（双击、多标签页）
//! 排队执行“检查 + 写入”，后到的请求能拿到明确的 already submitted。

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct SubmissionGuard {
    locks: DashMap<(i64, i64), Arc<Mutex<()>>>,
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取 (评委, 环节) 的独占锁，permit 释放前其余提交等待
    pub async fn acquire(&self, judge_id: i64, segment_id: i64) -> SubmissionPermit<'_> {
        let key = (judge_id, segment_id);
        // 先克隆出 Arc，避免持有 DashMap 分片锁跨越 await
        let lock = self.locks.entry(key).or_default().clone();
        let held = lock.lock_owned().await;
        SubmissionPermit {
            guard: self,
            key,
            held: Some(held),
        }
    }

    pub fn tracked_keys(&self) -> usize {
        self.locks.len()
    }
}

/// 持有期间独占 (评委, 环节)；释放后若无人等待则清理表项
pub struct SubmissionPermit<'a> {
    guard: &'a SubmissionGuard,
    key: (i64, i64),
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for SubmissionPermit<'_> {
    fn drop(&mut self) {
        // 先释放互斥锁，剩下的引用只有表项本身时才删除；
        // 新的 acquire 在分片锁内克隆 Arc，与 remove_if 互斥
        drop(self.held.take());
        self.guard
            .locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
