use serde::Deserialize;

// 评分细则创建请求（用于存储层与初始化数据）
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCriterionRequest {
    pub segment_id: i64,
    pub name: String,
    pub max_score: f64,
}
