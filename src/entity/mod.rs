//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体读写数据，再转换为 models 中的业务实体。

pub mod prelude;

pub mod admin_scores;
pub mod award_winners;
pub mod awards;
pub mod candidates;
pub mod contests;
pub mod criteria;
pub mod scores;
pub mod segments;
pub mod users;

use chrono::{DateTime, Utc};

// 数据库中时间统一存储为秒级时间戳
pub(crate) fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
