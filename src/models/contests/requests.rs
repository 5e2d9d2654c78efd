use serde::Deserialize;

// 比赛创建请求（用于存储层与初始化数据）
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContestRequest {
    pub name: String,
    pub image_url: Option<String>,
}
