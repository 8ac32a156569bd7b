// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration section types.
//!
//! ```text
//! Config: GlobalConfig, ScriptsConfig, ToolchainFlags
//! ScriptsConfig -> ScriptOptions (env::scripts)
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::env::{ScriptFormat, ScriptOptions};
use crate::logging::LogLevel;
use crate::subsystem::Subsystem;

/// `[global]` options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for stderr output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Log file; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::WARN,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// `[scripts]` options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptsConfig {
    /// Target subsystem for rendering.
    pub subsystem: Subsystem,
    /// Script formats to write; empty deduces one from the subsystem.
    pub formats: Vec<ScriptFormat>,
    /// Write deactivation companions.
    pub deactivate: bool,
    /// Directory receiving the scripts.
    pub output_dir: PathBuf,
    /// Launcher group the scripts are registered under.
    pub group: String,
    /// Profile files layered over the toolchain environment, in order.
    pub profiles: Vec<PathBuf>,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            subsystem: Subsystem::default(),
            formats: Vec::new(),
            deactivate: true,
            output_dir: PathBuf::from("."),
            group: "build".to_string(),
            profiles: Vec::new(),
        }
    }
}

impl ScriptsConfig {
    /// Script writer options for this section.
    #[must_use]
    pub fn script_options(&self) -> ScriptOptions {
        ScriptOptions::builder()
            .output_dir(self.output_dir.clone())
            .formats(self.formats.clone())
            .deactivate(self.deactivate)
            .group(self.group.clone())
            .build()
    }
}
