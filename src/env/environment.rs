// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Insertion-ordered set of pending variable mutations.
//!
//! ```text
//! Environment (IndexMap<String, EnvItem>)
//! Ops:     define/append/prepend (+ _path, _with_separator), unset, clean, remove
//! Compose: base.compose(&overlay) -> new Environment (inputs untouched)
//! Render:  vars(subsystem) -> EnvVars
//! ```
//!
//! A second setter call on the same name replaces the item wholesale; only
//! [`Environment::compose`] merges mutations.

use indexmap::IndexMap;
use tracing::{Level, debug, enabled, trace};

use super::item::{EnvItem, EnvKind, EnvToken, EnvValues, Separator, is_valid_name};
use super::vars::{EnvVars, LiveEnv};
use crate::error::EnvError;
use crate::subsystem::Subsystem;

/// Ordered mapping of variable name to pending mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    items: IndexMap<String, EnvItem>,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EnvItem> {
        self.items.get(name)
    }

    /// Iterates over `(name, item)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EnvItem)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Returns the item for `name`, inserting a no-op item if missing.
    pub fn get_or_create(&mut self, name: impl Into<String>) -> &mut EnvItem {
        self.items.entry(name.into()).or_default()
    }

    /// Checks that every declared name can be written into a script.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidName`] for the first name that does not
    /// match `[A-Za-z_][A-Za-z0-9_]*`.
    pub fn validate_names(&self) -> Result<(), EnvError> {
        match self.names().find(|name| !is_valid_name(name)) {
            Some(name) => Err(EnvError::InvalidName {
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Deep copy; the copy can be mutated without affecting `self`.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn define(&mut self, name: impl Into<String>, value: impl Into<EnvValues>) -> &mut Self {
        self.define_with_separator(name, value, " ")
    }

    pub fn define_with_separator(
        &mut self,
        name: impl Into<String>,
        value: impl Into<EnvValues>,
        separator: &str,
    ) -> &mut Self {
        self.get_or_create(name)
            .define(value, Separator::Text(separator.to_string()));
        self
    }

    pub fn define_path(
        &mut self,
        name: impl Into<String>,
        value: impl Into<EnvValues>,
    ) -> &mut Self {
        self.get_or_create(name).define(value, Separator::Path);
        self
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<EnvValues>) -> &mut Self {
        self.append_with_separator(name, value, " ")
    }

    pub fn append_with_separator(
        &mut self,
        name: impl Into<String>,
        value: impl Into<EnvValues>,
        separator: &str,
    ) -> &mut Self {
        self.get_or_create(name)
            .append(value, Separator::Text(separator.to_string()));
        self
    }

    pub fn append_path(
        &mut self,
        name: impl Into<String>,
        value: impl Into<EnvValues>,
    ) -> &mut Self {
        self.get_or_create(name).append(value, Separator::Path);
        self
    }

    pub fn prepend(&mut self, name: impl Into<String>, value: impl Into<EnvValues>) -> &mut Self {
        self.prepend_with_separator(name, value, " ")
    }

    pub fn prepend_with_separator(
        &mut self,
        name: impl Into<String>,
        value: impl Into<EnvValues>,
        separator: &str,
    ) -> &mut Self {
        self.get_or_create(name)
            .prepend(value, Separator::Text(separator.to_string()));
        self
    }

    pub fn prepend_path(
        &mut self,
        name: impl Into<String>,
        value: impl Into<EnvValues>,
    ) -> &mut Self {
        self.get_or_create(name).prepend(value, Separator::Path);
        self
    }

    /// Marks `name` for removal.
    pub fn unset(&mut self, name: impl Into<String>) -> &mut Self {
        self.get_or_create(name).unset();
        self
    }

    /// Marks `name` as present but empty.
    pub fn clean(&mut self, name: impl Into<String>) -> &mut Self {
        self.get_or_create(name).clean();
        self
    }

    /// Removes one literal value from an existing item.
    pub fn remove(&mut self, name: &str, value: &str) -> &mut Self {
        if let Some(item) = self.items.get_mut(name) {
            item.remove(value);
        }
        self
    }

    /// Layers `overlay` on top of `self` and returns the merged environment.
    ///
    /// Neither input is modified. Variables keep the base's order; names only
    /// present in the overlay follow in the overlay's order.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::SeparatorConflict`] if a variable is mutated in both
    /// layers with different separators.
    pub fn compose(&self, overlay: &Self) -> Result<Self, EnvError> {
        let mut result = self.clone();

        for (name, over) in &overlay.items {
            match result.items.get_mut(name) {
                Some(base) => {
                    let merged = over.compose_over(name, base)?;
                    trace!(name = %name, kind = ?merged.kind(), "composed variable");
                    *base = merged;
                }
                None => {
                    result.items.insert(name.clone(), over.clone());
                }
            }
        }

        debug!(
            base = self.len(),
            overlay = overlay.len(),
            result = result.len(),
            "composed environments"
        );
        if enabled!(Level::TRACE) {
            trace!(dump = %result.dumps(), "composed environment");
        }
        Ok(result)
    }

    /// Renders the environment for `subsystem` against the current process environment.
    #[must_use]
    pub fn vars(&self, subsystem: Subsystem) -> EnvVars {
        self.vars_with(subsystem, LiveEnv::capture())
    }

    /// Renders the environment for `subsystem` against an explicit live environment.
    #[must_use]
    pub fn vars_with(&self, subsystem: Subsystem, live: LiveEnv) -> EnvVars {
        EnvVars::new(self.clone(), subsystem, live)
    }

    /// Profile-style text form, one operation per line.
    ///
    /// Prepended values are written innermost last so that parsing the
    /// output back reproduces the same order. Path items carry `(path)` and
    /// other non-space separators carry `(sep=X)`; a separator containing
    /// `)` cannot be read back.
    #[must_use]
    pub fn dumps(&self) -> String {
        let mut lines = Vec::new();
        for (name, item) in &self.items {
            let marker = match item.separator() {
                Separator::Path => "(path)".to_string(),
                Separator::Text(text) if text != " " => format!("(sep={text})"),
                Separator::Text(_) => String::new(),
            };
            match item.kind() {
                EnvKind::Unset => lines.push(format!("{name}=!")),
                EnvKind::Clean => lines.push(format!("{name}=")),
                EnvKind::Define => {
                    let mut op = "=";
                    for value in item.literals() {
                        lines.push(format!("{name}{op}{marker}{value}"));
                        op = "+=";
                    }
                    if op == "=" {
                        lines.push(format!("{name}={marker}"));
                    }
                }
                EnvKind::Mutate => {
                    let tokens = item.tokens();
                    let index = tokens
                        .iter()
                        .position(|t| *t == EnvToken::PriorValue)
                        .unwrap_or(0);
                    for token in tokens[..index].iter().rev() {
                        if let EnvToken::Literal(value) = token {
                            lines.push(format!("{name}=+{marker}{value}"));
                        }
                    }
                    for token in &tokens[index..] {
                        if let EnvToken::Literal(value) = token {
                            lines.push(format!("{name}+={marker}{value}"));
                        }
                    }
                }
            }
        }
        lines.join("\n")
    }
}
