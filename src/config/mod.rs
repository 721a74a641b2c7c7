//! User configuration: budget limits and the bucket table, stored as JSON.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::categorize::{default_buckets, BucketTable, BudgetBucket};
use crate::models::{BudgetLimits, DEFAULT_LIMIT, OTHER_CATEGORY};

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "FINTRACK_CONFIG";
const CONFIG_FILE: &str = "config.json";
const DB_FILE: &str = "fintrack.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_limit_value")]
    pub default_limit: Decimal,
    /// Per-category limits, applied over the built-in defaults.
    #[serde(default)]
    pub budget_limits: BTreeMap<String, Decimal>,
    #[serde(default = "default_buckets")]
    pub buckets: Vec<BudgetBucket>,
    #[serde(default = "Config::default_bucket_value")]
    pub default_bucket: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_limit: Self::default_limit_value(),
            budget_limits: BTreeMap::new(),
            buckets: default_buckets(),
            default_bucket: Self::default_bucket_value(),
        }
    }
}

impl Config {
    pub fn default_limit_value() -> Decimal {
        DEFAULT_LIMIT
    }

    pub fn default_bucket_value() -> String {
        OTHER_CATEGORY.into()
    }

    /// `$FINTRACK_CONFIG`, else `config.json` in the platform config dir.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        Ok(project_dirs()?.config_dir().join(CONFIG_FILE))
    }

    /// Load from `path`. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = serde_json::from_str(&data)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }

    /// Built-in limits with this config's overrides applied. Invalid
    /// overrides are logged and skipped.
    pub fn to_budget_limits(&self) -> BudgetLimits {
        let mut limits = BudgetLimits::default();
        if let Err(e) = limits.set_default_limit(self.default_limit) {
            tracing::warn!(%e, "ignoring configured default limit");
        }
        for (category, limit) in &self.budget_limits {
            if let Err(e) = limits.update_limit(category, *limit) {
                tracing::warn!(%e, "ignoring configured limit");
            }
        }
        limits
    }

    pub fn bucket_table(&self) -> BucketTable {
        BucketTable::new(&self.buckets, &self.default_bucket)
    }
}

/// Where the expense store lives.
pub fn db_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join(DB_FILE))
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "fintrack", "fintrack")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}
