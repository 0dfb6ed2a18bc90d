// src/config.rs

use std::env;
use std::path::PathBuf;
use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    /// JSON store file. `None` keeps everything in memory.
    pub data_path: Option<PathBuf>,
    pub bind_addr: String,
    pub log_dir: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let data_path = env::var("DATA_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let log_dir = env::var("LOG_DIR")
            .unwrap_or_else(|_| "logs".to_string());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            data_path,
            bind_addr,
            log_dir,
            rust_log,
        }
    }
}
