use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_LATEX_COMPILER_URL: &str = "https://latexonline.cc";
const DEFAULT_COMPILE_TIMEOUT_SECS: u64 = 120;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub github: GitHubConfig,
    pub compiler: CompilerConfig,
    pub port: u16,
    pub rust_log: String,
}

/// Remote content store coordinates and credentials.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub owner: String,
    pub repo: String,
    pub access_token: String,
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct CompilerConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = match std::env::var("COMPILE_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("COMPILE_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_COMPILE_TIMEOUT_SECS,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            github: GitHubConfig {
                owner: require_env("GITHUB_OWNER")?,
                repo: require_env("GITHUB_REPO")?,
                access_token: require_env("GITHUB_ACCESS_TOKEN")?,
                api_url: optional_env("GITHUB_API_URL", DEFAULT_GITHUB_API_URL),
            },
            compiler: CompilerConfig {
                base_url: optional_env("LATEX_COMPILER_URL", DEFAULT_LATEX_COMPILER_URL),
                timeout: Duration::from_secs(timeout_secs),
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key)
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| default.to_string())
}
