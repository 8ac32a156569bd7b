// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Profile `[buildenv]`-style text: one operation per line.
//!
//! ```text
//! # comment
//! CC=gcc                      define
//! CFLAGS+=-O2                 append
//! PATH=+(path)/opt/bin        prepend, path-valued
//! LIBS+=(sep=,)m              append, joined with ","
//! OLD=!                       unset
//! EMPTY=                      define ""
//! zlib/*:CFLAGS+=-fPIC        only for references matching "zlib/*"
//! ```
//!
//! Each line is composed as an overlay over the lines before it for the same
//! pattern. [`ProfileEnvironment::env_for`] layers the global environment and
//! then every matching pattern, in declaration order.


use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, trace};
use wax::{Glob, Program};

use crate::env::{Environment, is_valid_name};
use crate::error::{EnvError, ProfileError, ToolenvResult};

const PATH_MARKER: &str = "(path)";
const SEP_MARKER: &str = "(sep=";

/// Operation parsed from one profile line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Define,
    Append,
    Prepend,
    Unset,
}

/// Environments declared by a profile, keyed by package pattern (`None` = global).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEnvironment {
    envs: IndexMap<Option<String>, Environment>,
}

impl ProfileEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses profile text.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::BadDefinition`] for a line without an operator
    /// or with a name outside `[A-Za-z_][A-Za-z0-9_]*`, and
    /// [`ProfileError::InvalidPattern`] for a pattern that is not a valid glob.
    pub fn loads(text: &str) -> Result<Self, ProfileError> {
        let mut profile = Self::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let bad = || ProfileError::BadDefinition {
                line: index + 1,
                text: line.to_string(),
            };
            let (target, op, value) = split_line(line).ok_or_else(bad)?;
            let (pattern, name) = match target.rsplit_once(':') {
                Some((pattern, name)) => (Some(pattern.trim()), name.trim()),
                None => (None, target),
            };
            if !is_valid_name(name) || pattern.is_some_and(str::is_empty) {
                return Err(bad());
            }
            if let Some(pattern) = pattern {
                compile(pattern)?;
            }

            let mut layer = Environment::new();
            apply(&mut layer, op, name, value);
            trace!(line = index + 1, pattern = ?pattern, name = %name, op = ?op, "profile line");

            let key = pattern.map(str::to_string);
            let merged = match profile.envs.get(&key) {
                Some(existing) => existing.compose(&layer).map_err(|e| {
                    debug!(line = index + 1, error = %e, "profile line conflicts");
                    bad()
                })?,
                None => layer,
            };
            profile.envs.insert(key, merged);
        }

        debug!(patterns = profile.envs.len(), "parsed profile environment");
        Ok(profile)
    }

    /// Reads and parses a profile file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a [`ProfileError`].
    pub fn load_file(path: &Path) -> ToolenvResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::loads(&text)?)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }

    /// Environment that applies to every reference.
    #[must_use]
    pub fn global(&self) -> Option<&Environment> {
        self.envs.get(&None)
    }

    /// Declared patterns, in order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.envs.keys().filter_map(Option::as_deref)
    }

    /// Composed environment for a package reference (`None` = global only).
    ///
    /// A pattern matches when its glob matches the whole reference or the
    /// package name before the first `/`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::SeparatorConflict`] if two matching layers disagree
    /// on a separator.
    pub fn env_for(&self, reference: Option<&str>) -> ToolenvResult<Environment> {
        let mut result = self.global().cloned().unwrap_or_default();

        let Some(reference) = reference else {
            return Ok(result);
        };
        let package = reference.split('/').next().unwrap_or(reference);

        for (pattern, env) in &self.envs {
            let Some(pattern) = pattern else { continue };
            let glob = compile(pattern)?;
            if glob.is_match(reference) || glob.is_match(package) {
                debug!(pattern = %pattern, reference = %reference, "profile pattern matched");
                result = result.compose(env)?;
            }
        }
        Ok(result)
    }

    /// Layers `other` over `self`, pattern by pattern.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::SeparatorConflict`] on incompatible mutations.
    pub fn compose(&self, other: &Self) -> Result<Self, EnvError> {
        let mut result = self.clone();
        for (pattern, env) in &other.envs {
            let merged = match result.envs.get(pattern) {
                Some(existing) => existing.compose(env)?,
                None => env.clone(),
            };
            result.envs.insert(pattern.clone(), merged);
        }
        Ok(result)
    }

    /// Text form that [`ProfileEnvironment::loads`] reads back.
    #[must_use]
    pub fn dumps(&self) -> String {
        let mut lines = Vec::new();
        for (pattern, env) in &self.envs {
            let dump = env.dumps();
            for line in dump.lines() {
                match pattern {
                    Some(pattern) => lines.push(format!("{pattern}:{line}")),
                    None => lines.push(line.to_string()),
                }
            }
        }
        lines.join("\n")
    }
}

fn compile(pattern: &str) -> Result<Glob<'_>, ProfileError> {
    Glob::new(pattern).map_err(|e| ProfileError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Splits `NAME<op>value` at the first `=`.
fn split_line(line: &str) -> Option<(&str, Op, &str)> {
    let eq = line.find('=')?;
    let (head, tail) = (&line[..eq], &line[eq + 1..]);

    let (target, op, value) = if let Some(target) = head.strip_suffix('+') {
        (target, Op::Append, tail)
    } else if let Some(value) = tail.strip_prefix('+') {
        (head, Op::Prepend, value)
    } else if tail.trim() == "!" {
        (head, Op::Unset, "")
    } else {
        (head, Op::Define, tail)
    };
    Some((target.trim(), op, value.trim()))
}

/// Value separator selected by a leading `(path)` or `(sep=X)` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Marker<'a> {
    Text(&'a str),
    Path,
}

/// Strips a leading separator marker from `value`.
fn split_marker(value: &str) -> (Marker<'_>, &str) {
    if let Some(rest) = value.strip_prefix(PATH_MARKER) {
        return (Marker::Path, rest.trim_start());
    }
    if let Some(rest) = value.strip_prefix(SEP_MARKER)
        && let Some((separator, rest)) = rest.split_once(')')
    {
        return (Marker::Text(separator), rest.trim_start());
    }
    (Marker::Text(" "), value)
}

fn apply(env: &mut Environment, op: Op, name: &str, value: &str) {
    let (marker, value) = split_marker(value);

    match (op, marker) {
        (Op::Unset, _) => env.unset(name),
        (Op::Define, Marker::Text(sep)) => env.define_with_separator(name, value, sep),
        (Op::Define, Marker::Path) => env.define_path(name, value),
        (Op::Append, Marker::Text(sep)) => env.append_with_separator(name, value, sep),
        (Op::Append, Marker::Path) => env.append_path(name, value),
        (Op::Prepend, Marker::Text(sep)) => env.prepend_with_separator(name, value, sep),
        (Op::Prepend, Marker::Path) => env.prepend_path(name, value),
    };
}
