use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid username regex"));

/// 评委账号常用编号式用户名（如 judge1），长度放宽到 3-32
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.len() < 3 || username.len() > 32 {
        return Err("Username length must be between 3 and 32 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, dots, underscores or hyphens");
    }
    Ok(())
}

/// 超级管理员初始密码策略：至少 8 位，包含大小写字母和数字
pub fn validate_password(password: &str) -> Result<(), String> {
    let mut errors = Vec::new();

    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

/// 分数必须是有限数且落在 [0, max] 内
pub fn validate_score(score: f64, max: f64) -> Result<(), String> {
    if !score.is_finite() {
        return Err("Score must be a finite number".to_string());
    }
    if score < 0.0 || score > max {
        return Err(format!("Score {score} is out of range (0 - {max})"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username() {
        assert!(validate_username("judge1").is_ok());
        assert!(validate_username("j.doe-2").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("bad name").is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("SecurePass123").is_ok());
        let err = validate_password("abc").unwrap_err();
        assert!(err.contains("at least 8 characters"));
        assert!(err.contains("uppercase"));
    }

    #[test]
    fn test_score_range() {
        assert!(validate_score(0.0, 60.0).is_ok());
        assert!(validate_score(60.0, 60.0).is_ok());
        assert!(validate_score(55.25, 60.0).is_ok());
        assert!(validate_score(60.01, 60.0).is_err());
        assert!(validate_score(-0.5, 60.0).is_err());
        assert!(validate_score(f64::NAN, 60.0).is_err());
        assert!(validate_score(f64::INFINITY, 60.0).is_err());
    }
}
