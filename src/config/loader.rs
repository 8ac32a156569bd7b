// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file(req)
//!   .add_toml_file_optional(opt)
//!   .add_toml_str()
//!   .with_env_prefix("TOOLENV")
//!   .set() / .apply_overrides(["section/key=value"])
//!        |
//!        v
//!    build() --> Config (validated)
//! ```

use anyhow::Context;
use std::path::{Path, PathBuf};

use super::Config;
use crate::error::{ConfigError, Result};

/// Keys whose override values are comma-separated lists.
const LIST_KEYS: &[&str] = &[
    "scripts.formats",
    "scripts.profiles",
    "toolchain.defines",
    "toolchain.cflags",
    "toolchain.cxxflags",
    "toolchain.ldflags",
    "toolchain.pkg_config_dirs",
];

/// Builder for loading configuration from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    files: Vec<(String, PathBuf)>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            files: Vec::new(),
        }
    }

    /// Adds a TOML file that must exist when `build()` is called.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(true));
        self.files.push(("file".to_string(), p.to_path_buf()));
        self
    }

    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(false));
        if p.exists() {
            self.files.push(("optional".to_string(), p.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        use config::{File, FileFormat};
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.files
            .push(("string".to_string(), PathBuf::from("<string>")));
        self
    }

    /// Reads `<PREFIX>_<SECTION>__<KEY>` environment variables.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets a configuration override.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or if the value cannot be converted
    /// to a configuration value.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
        Ok(self)
    }

    /// Applies `section/key=value` overrides, as given to `--set`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an override without `/` or `=`.
    pub fn apply_overrides<S: AsRef<str>>(mut self, overrides: &[S]) -> Result<Self> {
        for raw in overrides {
            let raw = raw.as_ref();
            let (key, value) = parse_override(raw)?;
            let updated = if LIST_KEYS.contains(&key.as_str()) {
                let items: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                self.set(&key, items)
            } else {
                self.set(&key, value.to_string())
            };
            self = updated.with_context(|| format!("invalid override '{raw}'"))?;
        }
        Ok(self)
    }

    /// Builds the configuration from all added sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] if:
    /// - Required configuration files are missing.
    /// - Configuration files have invalid TOML syntax.
    /// - Environment variables cannot be parsed.
    /// - The merged configuration cannot be deserialized into the `Config` struct.
    /// - A value fails [`Config::validate`].
    pub fn build(self) -> Result<Config> {
        let sources = self.describe_sources();
        let load_failed = |e: config::ConfigError| ConfigError::ParseError {
            sources: sources.clone(),
            message: e.to_string(),
        };

        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("scripts.formats")
                    .with_list_parse_key("scripts.profiles")
                    .with_list_parse_key("toolchain.defines")
                    .try_parsing(true),
            ),
            None => self.builder,
        };
        let cfg = builder.build().map_err(load_failed)?;
        let config: Config = cfg.try_deserialize().map_err(load_failed)?;
        config.validate()?;
        Ok(config)
    }

    /// Loaded files and the environment prefix, for error messages.
    fn describe_sources(&self) -> String {
        let mut sources: Vec<String> = self
            .files
            .iter()
            .map(|(_, path)| format!("'{}'", path.display()))
            .collect();
        if let Some(prefix) = &self.env_prefix {
            sources.push(format!("{prefix}_* variables"));
        }
        if sources.is_empty() {
            "defaults".to_string()
        } else {
            sources.join(", ")
        }
    }

    #[must_use]
    pub fn loaded_files(&self) -> Vec<(String, PathBuf)> {
        self.files.clone()
    }

    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, (source, path))| format!("{}. [{}] {}", i + 1, source, path.display()))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits `section/key=value` into `("section.key", "value")`.
fn parse_override(raw: &str) -> std::result::Result<(String, &str), ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        section: "set".to_string(),
        key: raw.to_string(),
        message: "expected 'section/key=value'".to_string(),
    };
    let (path, value) = raw.split_once('=').ok_or_else(invalid)?;
    let (section, key) = path.trim().split_once('/').ok_or_else(invalid)?;
    if section.is_empty() || key.is_empty() {
        return Err(invalid());
    }
    Ok((format!("{section}.{key}"), value.trim()))
}
