// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GNU-style compiler flags turned into an [`Environment`].
//!
//! ```text
//! ToolchainFlags                 Environment
//!   cc / cxx           -->  CC=..., CXX=...           (define)
//!   defines            -->  CPPFLAGS += -D<def>...    (append)
//!   cflags / cxxflags  -->  CFLAGS += ..., CXXFLAGS += ...
//!   ldflags            -->  LDFLAGS += ...
//!   pkg_config_dirs    -->  PKG_CONFIG_PATH =+ (path) ...
//! ```
//!
//! Empty inputs produce no variable at all, so a profile layered on top
//! keeps full control over anything the toolchain did not set.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::env::Environment;

/// Resolved compiler settings for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(default)]
pub struct ToolchainFlags {
    #[builder(into)]
    pub cc: Option<String>,
    #[builder(into)]
    pub cxx: Option<String>,
    #[builder(default)]
    pub defines: Vec<String>,
    #[builder(default)]
    pub cflags: Vec<String>,
    #[builder(default)]
    pub cxxflags: Vec<String>,
    #[builder(default)]
    pub ldflags: Vec<String>,
    #[builder(default)]
    pub pkg_config_dirs: Vec<PathBuf>,
}

impl ToolchainFlags {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Environment a GNU/autotools build expects for these flags.
    #[must_use]
    pub fn environment(&self) -> Environment {
        let mut env = Environment::new();

        if let Some(cc) = &self.cc {
            env.define("CC", cc);
        }
        if let Some(cxx) = &self.cxx {
            env.define("CXX", cxx);
        }
        if !self.defines.is_empty() {
            env.append(
                "CPPFLAGS",
                self.defines
                    .iter()
                    .map(|d| format!("-D{d}"))
                    .collect::<crate::env::EnvValues>(),
            );
        }
        for (name, flags) in [
            ("CXXFLAGS", &self.cxxflags),
            ("CFLAGS", &self.cflags),
            ("LDFLAGS", &self.ldflags),
        ] {
            if !flags.is_empty() {
                env.append(name, flags.clone());
            }
        }
        if !self.pkg_config_dirs.is_empty() {
            env.prepend_path(
                "PKG_CONFIG_PATH",
                self.pkg_config_dirs
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect::<crate::env::EnvValues>(),
            );
        }

        debug!(variables = env.len(), "toolchain environment");
        env
    }
}
