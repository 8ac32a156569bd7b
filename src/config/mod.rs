// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Layered configuration.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low -> high)
//! 1. defaults
//! 2. toolenv.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. TOOLENV_* env vars
//! 5. --set section/key=value, then dedicated CLI flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! TOOLENV_SCRIPTS__SUBSYSTEM=msys2   -> scripts.subsystem = "msys2"
//! TOOLENV_SCRIPTS__FORMATS=sh,ps1    -> scripts.formats = ["sh", "ps1"]
//! TOOLENV_GLOBAL__OUTPUT_LOG_LEVEL=4 -> global.output_log_level = 4
//! ```
//!
//! # Example
//!
//! ```toml
//! [scripts]
//! subsystem = "msys2"
//! formats = ["sh", "bat"]
//! output_dir = "build/generators"
//!
//! [toolchain]
//! cc = "gcc"
//! defines = ["NDEBUG"]
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::toolchain::ToolchainFlags;

use loader::ConfigLoader;
use types::{GlobalConfig, ScriptsConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Logging options.
    pub global: GlobalConfig,
    /// Script generation options.
    pub scripts: ScriptsConfig,
    /// Compiler settings feeding the generated environment.
    pub toolchain: ToolchainFlags,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use toolenv::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("toolenv.toml")
    ///     .with_env_prefix("TOOLENV")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Checks values serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty or non-identifier
    /// launcher group name.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let group = &self.scripts.group;
        let valid = !group.is_empty()
            && group
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(ConfigError::InvalidValue {
                section: "scripts".to_string(),
                key: "group".to_string(),
                message: format!("expected letters, digits, '_' or '-', got '{group}'"),
            });
        }
        Ok(())
    }

    /// Format configuration options for display, sorted by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_scripts_options(&mut options);
        self.format_toolchain_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
    }

    fn format_scripts_options(&self, options: &mut BTreeMap<String, String>) {
        let scripts = &self.scripts;
        options.insert("scripts.subsystem".into(), scripts.subsystem.to_string());
        options.insert("scripts.formats".into(), join(&scripts.formats));
        options.insert("scripts.deactivate".into(), scripts.deactivate.to_string());
        options.insert(
            "scripts.output_dir".into(),
            scripts.output_dir.display().to_string(),
        );
        options.insert("scripts.group".into(), scripts.group.clone());
        options.insert(
            "scripts.profiles".into(),
            join(scripts.profiles.iter().map(|p| p.display())),
        );
    }

    fn format_toolchain_options(&self, options: &mut BTreeMap<String, String>) {
        let toolchain = &self.toolchain;
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        options.insert("toolchain.cc".into(), opt(&toolchain.cc));
        options.insert("toolchain.cxx".into(), opt(&toolchain.cxx));
        options.insert("toolchain.defines".into(), join(&toolchain.defines));
        options.insert("toolchain.cflags".into(), join(&toolchain.cflags));
        options.insert("toolchain.cxxflags".into(), join(&toolchain.cxxflags));
        options.insert("toolchain.ldflags".into(), join(&toolchain.ldflags));
        options.insert(
            "toolchain.pkg_config_dirs".into(),
            join(toolchain.pkg_config_dirs.iter().map(|p| p.display())),
        );
    }
}

fn join<T: std::fmt::Display>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
