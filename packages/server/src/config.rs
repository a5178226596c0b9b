use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use crate::common::ValidationRules;

/// Where members, accounts and transfers are persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres { database_url: String },
    /// Process-local; everything is lost on restart
    Memory,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub port: u16,
    pub security_config_path: PathBuf,
    pub rules: ValidationRules,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let storage = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .as_str()
        {
            "postgres" => StorageBackend::Postgres {
                database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            },
            "memory" => StorageBackend::Memory,
            other => bail!("STORAGE_BACKEND must be postgres or memory, got {:?}", other),
        };

        let defaults = ValidationRules::default();
        let rules = ValidationRules {
            levels: match env::var("MANAGEMENT_LEVELS") {
                Ok(raw) => parse_list(&raw)
                    .into_iter()
                    .map(|level| level.parse::<i32>())
                    .collect::<Result<_, _>>()
                    .context("MANAGEMENT_LEVELS must be a comma-separated list of integers")?,
                Err(_) => defaults.levels,
            },
            roles: env::var("MANAGEMENT_ROLES")
                .map(|raw| parse_list(&raw))
                .unwrap_or(defaults.roles),
            transfer_categories: env::var("TRANSFER_CATEGORIES")
                .map(|raw| parse_list(&raw))
                .unwrap_or(defaults.transfer_categories),
        };

        Ok(Self {
            storage,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            security_config_path: env::var("MANAGEMENT_SECURITY_CONFIG")
                .unwrap_or_else(|_| "config/management_api.json".to_string())
                .into(),
            rules,
        })
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_trims_and_skips_blanks() {
        assert_eq!(parse_list(" wire, refund ,,"), vec!["wire", "refund"]);
        assert!(parse_list("").is_empty());
    }
}
