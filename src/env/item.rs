// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pending mutation of a single environment variable.
//!
//! ```text
//! EnvItem { tokens, separator, kind }
//!
//! define  ["a", "b"]          Define
//! append  [Prior, "a"]        Mutate   -> "$NAME:a"
//! prepend ["a", Prior]        Mutate   -> "a:$NAME"
//! unset   []                  Unset    -> variable removed
//! clean   []                  Clean    -> ""
//! ```
//!
//! A `Mutate` item always holds exactly one [`EnvToken::PriorValue`]; the
//! other kinds never hold one.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::EnvError;
use crate::subsystem::Subsystem;

/// Whether `name` matches `[A-Za-z_][A-Za-z0-9_]*`.
///
/// Only such names can be written into `sh`, `cmd.exe` and `PowerShell`
/// scripts without quoting.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// One element of an item's value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvToken {
    /// Literal text.
    Literal(String),
    /// Whatever the variable holds when the mutation is applied.
    PriorValue,
}

/// What applying an item does to the variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvKind {
    /// Replace the value.
    Define,
    /// Extend the prior value (append or prepend).
    Mutate,
    /// Remove the variable.
    Unset,
    /// Keep the variable, with an empty value.
    Clean,
}

/// Join separator for an item's tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Separator {
    /// Fixed text (a single space for flag-like variables).
    Text(String),
    /// The target's path-list separator; tokens are native paths.
    Path,
}

impl Separator {
    /// Resolves the separator for a target subsystem.
    #[must_use]
    pub fn resolve(&self, subsystem: Subsystem) -> &str {
        match self {
            Self::Text(sep) => sep,
            Self::Path => subsystem.path_separator(),
        }
    }

    #[must_use]
    pub const fn is_path(&self) -> bool {
        matches!(self, Self::Path)
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self::Text(" ".to_string())
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(sep) => f.write_str(sep),
            Self::Path => f.write_str("(path)"),
        }
    }
}

/// Ordered list of literal values accepted by the item setters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvValues(Vec<String>);

impl EnvValues {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_tokens(self) -> impl Iterator<Item = EnvToken> {
        self.0.into_iter().map(EnvToken::Literal)
    }
}

impl From<&str> for EnvValues {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl From<String> for EnvValues {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<&String> for EnvValues {
    fn from(value: &String) -> Self {
        Self(vec![value.clone()])
    }
}

impl From<&Path> for EnvValues {
    fn from(value: &Path) -> Self {
        Self(vec![value.to_string_lossy().into_owned()])
    }
}

impl From<PathBuf> for EnvValues {
    fn from(value: PathBuf) -> Self {
        Self::from(value.as_path())
    }
}

impl From<Vec<String>> for EnvValues {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<Vec<&str>> for EnvValues {
    fn from(values: Vec<&str>) -> Self {
        Self(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for EnvValues {
    fn from(values: &[&str]) -> Self {
        Self(values.iter().map(|v| (*v).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for EnvValues {
    fn from(values: [&str; N]) -> Self {
        Self(values.into_iter().map(str::to_string).collect())
    }
}

impl FromIterator<String> for EnvValues {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Pending mutation of one environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvItem {
    tokens: Vec<EnvToken>,
    separator: Separator,
    kind: EnvKind,
}

impl Default for EnvItem {
    fn default() -> Self {
        Self::keep()
    }
}

impl EnvItem {
    /// An item that leaves the variable as it is (a lone prior-value token).
    #[must_use]
    pub fn keep() -> Self {
        Self {
            tokens: vec![EnvToken::PriorValue],
            separator: Separator::default(),
            kind: EnvKind::Mutate,
        }
    }

    #[must_use]
    pub fn tokens(&self) -> &[EnvToken] {
        &self.tokens
    }

    #[must_use]
    pub const fn separator(&self) -> &Separator {
        &self.separator
    }

    #[must_use]
    pub const fn kind(&self) -> EnvKind {
        self.kind
    }

    /// Whether the item references the variable's prior value.
    #[must_use]
    pub fn has_prior(&self) -> bool {
        self.prior_index().is_some()
    }

    /// Whether applying the item changes nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.kind == EnvKind::Mutate && self.tokens == [EnvToken::PriorValue]
    }

    fn prior_index(&self) -> Option<usize> {
        self.tokens.iter().position(|t| *t == EnvToken::PriorValue)
    }

    /// Literal values, in order, without the prior-value token.
    pub fn literals(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            EnvToken::Literal(v) => Some(v.as_str()),
            EnvToken::PriorValue => None,
        })
    }

    /// Replaces the item with a definition.
    pub fn define(&mut self, values: impl Into<EnvValues>, separator: Separator) -> &mut Self {
        self.tokens = values.into().into_tokens().collect();
        self.separator = separator;
        self.kind = EnvKind::Define;
        self
    }

    /// Replaces the item with "prior value, then `values`".
    pub fn append(&mut self, values: impl Into<EnvValues>, separator: Separator) -> &mut Self {
        self.tokens = std::iter::once(EnvToken::PriorValue)
            .chain(values.into().into_tokens())
            .collect();
        self.separator = separator;
        self.kind = EnvKind::Mutate;
        self
    }

    /// Replaces the item with "`values`, then prior value".
    pub fn prepend(&mut self, values: impl Into<EnvValues>, separator: Separator) -> &mut Self {
        self.tokens = values
            .into()
            .into_tokens()
            .chain(std::iter::once(EnvToken::PriorValue))
            .collect();
        self.separator = separator;
        self.kind = EnvKind::Mutate;
        self
    }

    pub fn unset(&mut self) -> &mut Self {
        self.tokens.clear();
        self.kind = EnvKind::Unset;
        self
    }

    pub fn clean(&mut self) -> &mut Self {
        self.tokens.clear();
        self.kind = EnvKind::Clean;
        self
    }

    /// Drops every literal token equal to `value`.
    pub fn remove(&mut self, value: &str) -> &mut Self {
        self.tokens
            .retain(|t| !matches!(t, EnvToken::Literal(v) if v == value));
        self
    }

    /// Applies `self` (overlay) on top of `base`.
    ///
    /// Non-mutating overlays win outright. A mutating overlay splices the
    /// base tokens in place of its prior-value token; the result stays a
    /// mutation only if the base still references its own prior value.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::SeparatorConflict`] when both items are mutations
    /// joined by different separators.
    pub fn compose_over(&self, name: &str, base: &Self) -> Result<Self, EnvError> {
        if self.kind != EnvKind::Mutate {
            return Ok(self.clone());
        }
        let Some(index) = self.prior_index() else {
            return Ok(self.clone());
        };

        if base.kind == EnvKind::Mutate && base.separator != self.separator {
            return Err(EnvError::SeparatorConflict {
                name: name.to_string(),
                base: base.separator.to_string(),
                overlay: self.separator.to_string(),
            });
        }

        let mut tokens = Vec::with_capacity(self.tokens.len() + base.tokens.len());
        tokens.extend_from_slice(&self.tokens[..index]);
        tokens.extend_from_slice(&base.tokens);
        tokens.extend_from_slice(&self.tokens[index + 1..]);

        let kind = match base.kind {
            EnvKind::Mutate => EnvKind::Mutate,
            // an unset or cleaned base contributes nothing to splice
            EnvKind::Define | EnvKind::Unset | EnvKind::Clean => EnvKind::Define,
        };

        Ok(Self {
            tokens,
            separator: self.separator.clone(),
            kind,
        })
    }

    /// Renders the literal tokens for `subsystem`, split around the prior value.
    #[must_use]
    pub fn render_parts(&self, subsystem: Subsystem) -> RenderedValue {
        let translate = |value: &str| {
            if self.separator.is_path() {
                subsystem.translate(value)
            } else {
                value.to_string()
            }
        };

        let mut before = Vec::new();
        let mut after = Vec::new();
        let mut seen_prior = false;
        for token in &self.tokens {
            match token {
                EnvToken::PriorValue => seen_prior = true,
                EnvToken::Literal(value) if seen_prior => after.push(translate(value)),
                EnvToken::Literal(value) => before.push(translate(value)),
            }
        }

        RenderedValue {
            kind: self.kind,
            separator: self.separator.resolve(subsystem).to_string(),
            before,
            prior: seen_prior,
            after,
        }
    }
}

/// An item resolved for a target, with the prior value still open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedValue {
    pub kind: EnvKind,
    pub separator: String,
    /// Literals preceding the prior value (all literals if there is none).
    pub before: Vec<String>,
    pub prior: bool,
    /// Literals following the prior value.
    pub after: Vec<String>,
}

impl RenderedValue {
    /// Joins the value, substituting `prior` for the prior-value token.
    ///
    /// An absent or empty prior value is dropped together with its separator.
    #[must_use]
    pub fn join(&self, prior: Option<&str>) -> String {
        let prior = prior.filter(|p| self.prior && !p.is_empty());
        self.before
            .iter()
            .map(String::as_str)
            .chain(prior)
            .chain(self.after.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(&self.separator)
    }

    #[must_use]
    pub fn joined_before(&self) -> String {
        self.before.join(&self.separator)
    }

    #[must_use]
    pub fn joined_after(&self) -> String {
        self.after.join(&self.separator)
    }
}
