use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

/// 登录成功后返回的令牌与账号信息
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// 令牌有效秒数
    pub expires_in: i64,
    pub user: User,
    /// 前端据此进入评委端或管理端
    pub landing: SessionLanding,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub enum SessionLanding {
    Judging,
    Admin,
}

impl SessionLanding {
    pub fn for_user(user: &User) -> Self {
        if user.role.is_admin() {
            SessionLanding::Admin
        } else {
            SessionLanding::Judging
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct CurrentUserResponse {
    pub user: User,
    pub landing: SessionLanding,
}
