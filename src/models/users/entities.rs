use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Judge,      // 评委
    Admin,      // 管理员
    Superadmin, // 超级管理员
}

impl UserRole {
    pub const JUDGE: &'static str = "judge";
    pub const ADMIN: &'static str = "admin";
    pub const SUPERADMIN: &'static str = "superadmin";

    pub fn judge_roles() -> &'static [&'static UserRole] {
        &[&Self::Judge]
    }
    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Superadmin]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Judge, &Self::Admin, &Self::Superadmin]
    }

    /// 是否可以接收管理端 KPI 推送
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Superadmin)
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid user role: '{s}'. Supported roles: judge, admin, superadmin"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Judge => write!(f, "{}", UserRole::JUDGE),
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
            UserRole::Superadmin => write!(f, "{}", UserRole::SUPERADMIN),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::JUDGE => Ok(UserRole::Judge),
            UserRole::ADMIN => Ok(UserRole::Admin),
            UserRole::SUPERADMIN => Ok(UserRole::Superadmin),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    /// 当前唯一有效的会话，新登录会覆盖旧值
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub active_session_id: Option<String>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// 会话是否仍为该用户的当前会话
    pub fn is_current_session(&self, session_id: &str) -> bool {
        self.active_session_id.as_deref() == Some(session_id)
    }

    // 生成访问令牌
    pub fn generate_access_token(
        &self,
        session_id: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        crate::utils::jwt::JwtUtils::generate_access_token(
            self.id,
            &self.role.to_string(),
            session_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in UserRole::all_roles() {
            let parsed: UserRole = role.to_string().parse().unwrap();
            assert_eq!(&parsed, *role);
        }
        assert!("viewer".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_admin_roles() {
        assert!(UserRole::Admin.is_admin());
        assert!(UserRole::Superadmin.is_admin());
        assert!(!UserRole::Judge.is_admin());
    }
}
