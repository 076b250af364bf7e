use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

use crate::auth::{decode_secret_key, AuthConfig};

const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("BW_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid BW_LISTEN_ADDR")?;
        let db_path = std::env::var("BW_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let cors_allow = std::env::var("BW_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("BW_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);

        let raw_secret =
            std::env::var("BW_JWT_SECRET").context("BW_JWT_SECRET must be set")?;
        let jwt_secret = decode_secret_key(&raw_secret).context("Invalid BW_JWT_SECRET")?;
        let ttl_secs: u64 = std::env::var("BW_JWT_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS);

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            auth: AuthConfig {
                jwt_secret,
                access_token_ttl: Duration::from_secs(ttl_secs),
            },
        })
    }
}
