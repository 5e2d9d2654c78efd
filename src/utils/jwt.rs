use crate::config::AppConfig;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Subject (user ID)
    pub role: String, // 用户角色
    pub sid: String,  // 会话 ID，须与 users.active_session_id 一致
    pub exp: usize,   // Expiration time (时间戳)
    pub iat: usize,   // Issued at (签发时间)
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 生成 Access Token
    pub fn generate_access_token(
        user_id: i64,
        role: &str,
        session_id: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::encode_with(
            &config.jwt.secret,
            user_id,
            role,
            session_id,
            chrono::Duration::minutes(config.jwt.access_token_expiry),
        )
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_with(&AppConfig::get().jwt.secret, token)
    }

    /// 使用指定密钥签发
    pub fn encode_with(
        secret: &str,
        user_id: i64,
        role: &str,
        session_id: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            sid: session_id.to_string(),
            exp: expiration.timestamp().max(0) as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// 使用指定密钥校验签名与有效期
    pub fn decode_with(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());
        decode::<Claims>(token, &decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_carries_session_id() {
        let token = JwtUtils::encode_with(
            "secret",
            42,
            "judge",
            "session-a",
            chrono::Duration::minutes(5),
        )
        .unwrap();
        let claims = JwtUtils::decode_with("secret", &token).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, "judge");
        assert_eq!(claims.sid, "session-a");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token =
            JwtUtils::encode_with("secret", 1, "admin", "s", chrono::Duration::minutes(5))
                .unwrap();
        assert!(JwtUtils::decode_with("other", &token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token =
            JwtUtils::encode_with("secret", 1, "admin", "s", chrono::Duration::minutes(-10))
                .unwrap();
        assert!(JwtUtils::decode_with("secret", &token).is_err());
    }
}
