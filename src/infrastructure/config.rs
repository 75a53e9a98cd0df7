use std::env;

use super::db::DEFAULT_MAX_CONNECTIONS;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    pub cors_allowed_origins: Vec<String>,
    pub static_dir: String,
    /// Seconds between overdue sweeps; 0 disables the background sweeper
    pub overdue_sweep_interval_secs: u64,
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://biblioteca.db?mode=rwc".to_string()),
            port: parse_var("PORT").unwrap_or(3000),
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(DEFAULT_MAX_CONNECTIONS),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string()),
            overdue_sweep_interval_secs: parse_var("OVERDUE_SWEEP_INTERVAL_SECS").unwrap_or(3600),
            seed_demo: env::var("SEED_DEMO").is_ok(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
