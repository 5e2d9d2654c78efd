use serde::Deserialize;

use super::entities::SegmentType;
use crate::models::common::ScoringStatus;

// 环节创建请求（用于存储层与初始化数据）
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSegmentRequest {
    pub contest_id: i64,
    pub name: String,
    pub percentage: f64,
    pub segment_type: SegmentType,
    pub status: ScoringStatus,
}
