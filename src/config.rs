use std::{env, path::PathBuf, str::FromStr};

use anyhow::anyhow;

/// How stored passwords are compared at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordMode {
    /// Stored text is compared to the supplied text as-is.
    Plaintext,
    /// Passwords are stored as argon2 PHC strings and verified against them.
    Argon2,
}

impl FromStr for PasswordMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" => Ok(Self::Plaintext),
            "argon2" => Ok(Self::Argon2),
            other => Err(anyhow!("unknown PASSWORD_MODE `{other}`")),
        }
    }
}

/// Whether table writes drop the search snapshot of that table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Snapshot is taken once and only dropped explicitly.
    Snapshot,
    InvalidateOnWrite,
}

impl FromStr for CachePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snapshot" => Ok(Self::Snapshot),
            "invalidate_on_write" => Ok(Self::InvalidateOnWrite),
            other => Err(anyhow!("unknown SEARCH_CACHE_POLICY `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub session_file: PathBuf,
    pub password_mode: PasswordMode,
    pub cache_policy: CachePolicy,
    pub enforce_role_ceiling: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let session_file = env::var("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".console/session.json"));
        let password_mode = match env::var("PASSWORD_MODE") {
            Ok(v) => v.parse()?,
            Err(_) => PasswordMode::Argon2,
        };
        let cache_policy = match env::var("SEARCH_CACHE_POLICY") {
            Ok(v) => v.parse()?,
            Err(_) => CachePolicy::InvalidateOnWrite,
        };
        let enforce_role_ceiling = env::var("ENFORCE_ROLE_CEILING")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(true);
        Ok(Self {
            port,
            database_url,
            host,
            session_file,
            password_mode,
            cache_policy,
            enforce_role_ceiling,
        })
    }
}
