use serde::Deserialize;
use ts_rs::TS;

// 评委或管理员登录，账号由管理员预先分配
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    /// 去掉用户名首尾空白，空字段直接拒绝
    pub fn normalized(mut self) -> Result<Self, &'static str> {
        self.username = self.username.trim().to_string();
        if self.username.is_empty() || self.password.is_empty() {
            return Err("Username and password are required");
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_trims_username() {
        let request = LoginRequest {
            username: "  judge01 ".to_string(),
            password: "Secret123".to_string(),
        };
        assert_eq!(request.normalized().unwrap().username, "judge01");
    }

    #[test]
    fn test_normalized_rejects_blank_fields() {
        let request = LoginRequest {
            username: "   ".to_string(),
            password: "Secret123".to_string(),
        };
        assert!(request.normalized().is_err());
    }
}
