use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 直接映射到配置项的环境变量
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("app.environment", "APP_ENV"),
    ("app.log_level", "RUST_LOG"),
    ("server.host", "SERVER_HOST"),
    ("server.port", "SERVER_PORT"),
    ("server.unix_socket_path", "UNIX_SOCKET"),
    ("server.workers", "CPU_COUNT"),
    ("jwt.secret", "JWT_SECRET"),
    ("database.url", "DATABASE_URL"),
    ("scoring.precision", "SCORING_PRECISION"),
    ("bootstrap.superadmin_username", "SUPERADMIN_USERNAME"),
];

/// config.toml 中的示例密钥
const PLACEHOLDER_SECRET: &str = "change-me-in-production";

/// 四舍五入精度上限，再高已超出 f64 的可靠位数
const MAX_PRECISION: u32 = 6;

impl AppConfig {
    /// 加载配置：config.toml → config.{APP_ENV}.toml → TABULATION_* → 常用环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let profile = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{profile}")).required(false))
            .add_source(
                Environment::with_prefix("TABULATION")
                    .separator("_")
                    .try_parsing(true),
            );

        for (key, var) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;
        app_config.normalize();
        app_config.validate()?;
        Ok(app_config)
    }

    // 补全依赖运行环境的默认值
    fn normalize(&mut self) {
        if self.server.workers == 0 {
            self.server.workers = num_cpus::get().min(self.server.max_workers).max(1);
        }
        self.bootstrap.superadmin_username = self.bootstrap.superadmin_username.trim().to_string();
    }

    /// 拒绝会让计分或推送失效的配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scoring.precision > MAX_PRECISION {
            return Err(ConfigError::Message(format!(
                "scoring.precision must be at most {MAX_PRECISION}"
            )));
        }
        if self.realtime.heartbeat_interval >= self.realtime.client_timeout {
            return Err(ConfigError::Message(
                "realtime.heartbeat_interval must be shorter than realtime.client_timeout".into(),
            ));
        }
        if self.jwt.access_token_expiry <= 0 {
            return Err(ConfigError::Message(
                "jwt.access_token_expiry must be positive".into(),
            ));
        }
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must be set".into()));
        }
        if self.is_production() && self.jwt.secret == PLACEHOLDER_SECRET {
            return Err(ConfigError::Message(
                "jwt.secret must be changed in production".into(),
            ));
        }
        Ok(())
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 启动时调用一次
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }

    /// CORS 是否允许任意来源
    pub fn allows_any_origin(&self) -> bool {
        self.cors.allowed_origins.is_empty() || self.cors.allowed_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let config = AppConfig::default();
        assert_eq!(config.jwt.access_token_expiry, 480);
        assert_eq!(config.scoring.precision, 2);
        assert!(config.allows_any_origin());
        assert_eq!(config.server_bind_address(), "127.0.0.1:3000");
    }

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.jwt.secret = PLACEHOLDER_SECRET.to_string();
        config
    }

    #[test]
    fn test_validate_requires_secret() {
        assert!(AppConfig::default().validate().is_err());
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_heartbeat_longer_than_timeout() {
        let mut config = valid_config();
        config.realtime.heartbeat_interval = config.realtime.client_timeout;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_default_secret_in_production() {
        let mut config = valid_config();
        config.app.environment = "production".to_string();
        assert!(config.validate().is_err());
        config.jwt.secret = "a-long-random-production-secret".to_string();
        assert!(config.validate().is_ok());
    }
}
