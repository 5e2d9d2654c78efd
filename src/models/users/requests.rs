use super::entities::UserRole;
use serde::Deserialize;

// 用户创建请求（用于存储层，password 为已哈希的密码）
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: UserRole,
}
