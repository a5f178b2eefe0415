use std::env;

const DEFAULT_TABLE_URL: &str = "https://oregonshores.org/mile-watch/miles";
const DEFAULT_DETAIL_BASE: &str = "https://oregonshores.org/mile-watch/miles";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres cache
    pub database_url: String,

    // Scrape targets
    pub source_table_url: String,
    pub detail_base_url: String,

    // Scheduling
    pub harvest_interval_hours: u64,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            source_table_url: env::var("SOURCE_TABLE_URL")
                .unwrap_or_else(|_| DEFAULT_TABLE_URL.to_string()),
            detail_base_url: env::var("DETAIL_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_DETAIL_BASE.to_string()),
            harvest_interval_hours: env::var("HARVEST_INTERVAL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("HARVEST_INTERVAL_HOURS must be a number"),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
        }
    }

    /// Load a minimal config for the web server (read path only, no scrape targets).
    pub fn web_from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            source_table_url: String::new(),
            detail_base_url: String::new(),
            harvest_interval_hours: 0,
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
