// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Rendered view of an [`Environment`] for one target subsystem.
//!
//! ```text
//! Environment --vars(subsystem)--> EnvVars
//!                                    |
//!        +---------------------------+-------------------------+
//!        |                           |                         |
//!   in-process                  child process               scripts
//!   get / lookup / items        apply_to(Command)           save_sh / save_bat / save_ps1
//!   prior = LiveEnv value       env / env_remove            prior = $NAME / %NAME% / $env:NAME
//! ```
//!
//! On Windows-like targets the live environment is searched
//! case-insensitively; declared names keep their casing.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::process::Command;

use super::environment::Environment;
use super::item::{EnvItem, EnvKind, RenderedValue};
use crate::error::EnvError;
use crate::subsystem::Subsystem;
use tracing::trace;

/// Snapshot of a live process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveEnv {
    vars: BTreeMap<String, String>,
}

impl LiveEnv {
    /// Captures the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    #[must_use]
    pub fn capture() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Builds a snapshot from raw OS pairs, skipping any that are not UTF-8.
    #[must_use]
    pub fn from_os_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let vars = vars
            .into_iter()
            .filter_map(|(name, value)| match (name.into_string(), value.into_string()) {
                (Ok(name), Ok(value)) => Some((name, value)),
                (name, _) => {
                    trace!(name = ?name, "skipping non-UTF-8 environment variable");
                    None
                }
            })
            .collect();
        Self { vars }
    }

    /// An empty environment (every variable undefined).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn from_map(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }

    /// Adds or replaces a variable.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Looks up `name`, falling back to a case-insensitive match when `fold_case` is set.
    #[must_use]
    pub fn get(&self, name: &str, fold_case: bool) -> Option<&str> {
        if let Some(value) = self.vars.get(name) {
            return Some(value);
        }
        if !fold_case {
            return None;
        }
        self.vars
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An [`Environment`] bound to a target subsystem and a live environment.
#[derive(Debug, Clone)]
pub struct EnvVars {
    env: Environment,
    subsystem: Subsystem,
    live: LiveEnv,
}

impl EnvVars {
    pub(crate) const fn new(env: Environment, subsystem: Subsystem, live: LiveEnv) -> Self {
        Self {
            env,
            subsystem,
            live,
        }
    }

    #[must_use]
    pub const fn subsystem(&self) -> Subsystem {
        self.subsystem
    }

    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.env
    }

    /// Items in declaration order.
    pub(crate) fn declared(&self) -> impl Iterator<Item = (&str, &EnvItem)> {
        self.env.iter()
    }

    /// Renders `name` for the target, with the prior value left open.
    #[must_use]
    pub fn rendered(&self, name: &str) -> Option<RenderedValue> {
        self.env.get(name).map(|item| item.render_parts(self.subsystem))
    }

    fn resolve(&self, name: &str, item: &EnvItem) -> Option<String> {
        if item.kind() == EnvKind::Unset {
            return None;
        }
        let prior = self.live.get(name, self.subsystem.folds_name_case());
        if item.is_noop() {
            return prior.map(str::to_string);
        }
        Some(item.render_parts(self.subsystem).join(prior))
    }

    /// Resolved value of `name`, or `None` if it is undeclared, unset or a
    /// no-op over an undefined live variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.env.get(name).and_then(|item| self.resolve(name, item))
    }

    /// Resolved value of `name`, or `default`.
    #[must_use]
    pub fn get_or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    /// Resolved value of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Unset`] for an unset variable and
    /// [`EnvError::NotDefined`] for an undeclared one. A cleaned variable
    /// resolves to `""`.
    pub fn lookup(&self, name: &str) -> Result<String, EnvError> {
        let item = self.env.get(name).ok_or_else(|| EnvError::NotDefined {
            name: name.to_string(),
        })?;
        if item.kind() == EnvKind::Unset {
            return Err(EnvError::Unset {
                name: name.to_string(),
            });
        }
        self.resolve(name, item).ok_or_else(|| EnvError::NotDefined {
            name: name.to_string(),
        })
    }

    /// Resolved `(name, value)` pairs in declaration order, unset variables skipped.
    pub fn items(&self) -> impl Iterator<Item = (&str, String)> {
        self.env
            .iter()
            .filter_map(|(name, item)| self.resolve(name, item).map(|value| (name, value)))
    }

    /// Names whose value must be removed from a child environment.
    pub fn unset_names(&self) -> impl Iterator<Item = &str> {
        self.env
            .iter()
            .filter(|(_, item)| item.kind() == EnvKind::Unset)
            .map(|(name, _)| name)
    }

    /// Applies the resolved environment to a child process.
    pub fn apply_to<'c>(&self, command: &'c mut Command) -> &'c mut Command {
        for name in self.unset_names() {
            command.env_remove(name);
        }
        for (name, value) in self.items() {
            command.env(name, value);
        }
        command
    }
}
