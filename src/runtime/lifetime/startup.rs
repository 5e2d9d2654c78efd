use crate::config::AppConfig;
use crate::errors::{Result, TabulationError};
use crate::models::AppStartTime;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::realtime::{ConnectionRegistry, RankingBroadcaster};
use crate::services::SubmissionGuard;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_password, validate_username};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub registry: Arc<ConnectionRegistry>,
    pub broadcaster: RankingBroadcaster,
    pub guard: Arc<SubmissionGuard>,
}

/// 生成满足密码策略的随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    use rand::seq::SliceRandom;

    const UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
    const LOWER: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
    const DIGITS: &[u8] = b"23456789";
    const ALL: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789!@#$%";

    let mut rng = rand::rng();
    let mut chars: Vec<char> = [UPPER, LOWER, DIGITS]
        .iter()
        .map(|set| set[rng.random_range(0..set.len())] as char)
        .collect();
    while chars.len() < length {
        chars.push(ALL[rng.random_range(0..ALL.len())] as char);
    }
    chars.shuffle(&mut rng);
    chars.into_iter().collect()
}

/// 用户表为空时创建超级管理员
async fn seed_superadmin(storage: &Arc<dyn Storage>, config: &AppConfig) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping superadmin seed",
                count
            );
            return;
        }
        Ok(_) => info!("No users found in database, creating superadmin account..."),
        Err(e) => {
            warn!("Failed to count users: {}, skipping superadmin seed", e);
            return;
        }
    }

    let username = config.bootstrap.superadmin_username.trim();
    if let Err(e) = validate_username(username) {
        warn!("Invalid superadmin username '{}': {}", username, e);
        return;
    }

    let password = match std::env::var("SUPERADMIN_PASSWORD") {
        Ok(password) => {
            if let Err(e) = validate_password(&password) {
                warn!("SUPERADMIN_PASSWORD rejected: {}", e);
                return;
            }
            password
        }
        Err(_) => {
            let pwd = generate_random_password(16);
            warn!("==========================================================");
            warn!("  SUPERADMIN_PASSWORD NOT SET - USING GENERATED PASSWORD");
            warn!("  Generated password for '{}': {}", username, pwd);
            warn!("  Please save this password or set SUPERADMIN_PASSWORD");
            warn!("==========================================================");
            pwd
        }
    };

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash superadmin password: {}", e);
            return;
        }
    };

    let request = CreateUserRequest {
        username: username.to_string(),
        password: password_hash,
        role: UserRole::Superadmin,
    };
    match storage.create_user(request).await {
        Ok(user) => info!(
            "Superadmin account created (ID: {}, username: {})",
            user.id, user.username
        ),
        Err(e) => warn!("Failed to create superadmin account: {}", e),
    }
}

/// 准备服务器启动所需的共享状态
pub async fn prepare_server_startup(started: AppStartTime) -> Result<StartupContext> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| {
            TabulationError::database_config("Failed to install rustls crypto provider")
        })?;

    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_superadmin(&storage, config).await;

    let registry = Arc::new(ConnectionRegistry::new(config.realtime.channel_capacity));
    let broadcaster = RankingBroadcaster::new(
        registry.clone(),
        storage.clone(),
        config.scoring.precision,
        started,
    );

    Ok(StartupContext {
        storage,
        registry,
        broadcaster,
        guard: Arc::new(SubmissionGuard::new()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_passes_policy() {
        for _ in 0..50 {
            let pwd = generate_random_password(16);
            assert_eq!(pwd.chars().count(), 16);
            assert!(validate_password(&pwd).is_ok(), "weak password: {pwd}");
        }
    }
}
