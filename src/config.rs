// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Compile configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default bound on normalization growth, in tree elements
pub const DEFAULT_TERM_LIMIT: usize = 100_000;

/// Compile configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Maximum element count a normalization may produce before aborting
    pub term_limit: usize,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            term_limit: DEFAULT_TERM_LIMIT,
        }
    }
}

impl CompileConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: CompileConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from("polycsg.toml").exists() {
            Self::from_file("polycsg.toml")?
        } else {
            Self::default()
        };

        if let Ok(limit) = std::env::var("POLYCSG_TERM_LIMIT") {
            config.term_limit = limit
                .parse()
                .context("POLYCSG_TERM_LIMIT is not a valid element count")?;
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_term_limit() {
        let config = CompileConfig::default();
        assert_eq!(config.term_limit, DEFAULT_TERM_LIMIT);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = CompileConfig { term_limit: 2500 };
        let text = toml::to_string_pretty(&config).unwrap();
        let back: CompileConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.term_limit, 2500);
    }
}
