// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            ToolenvError (~24 bytes)
//!                     |
//!   +------+------+---+----+------+------+
//!   |      |      |        |      |      |
//!   v      v      v        v      v      v
//!  Env  Subsys Profile    Cfg     Fs     Io
//!  Box   Box    Box       Box    Box    Box
//!
//! Sub-errors (unboxed internally):
//!   Env        SeparatorConflict, InvalidName, NotDefined, Unset
//!   Subsystem  Unknown
//!   Profile    BadDefinition, InvalidPattern
//!   Config     ParseError, InvalidValue
//!   Fs         WriteFailed, CreateDirFailed
//!
//! All variants boxed => ToolenvError fits in 24 bytes.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`ToolenvError`].
pub type ToolenvResult<T> = std::result::Result<T, ToolenvError>;

/// Top-level error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum ToolenvError {
    /// Environment composition or lookup failed.
    #[error("environment error: {0}")]
    Env(#[from] Box<EnvError>),

    /// Subsystem path translation failed.
    #[error("subsystem error: {0}")]
    Subsystem(#[from] Box<SubsystemError>),

    /// Profile text could not be parsed.
    #[error("profile error: {0}")]
    Profile(#[from] Box<ProfileError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for ToolenvError {
                fn from(err: $error) -> Self {
                    ToolenvError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    EnvError => Env,
    SubsystemError => Subsystem,
    ProfileError => Profile,
    ConfigError => Config,
    FsError => Fs,
    std::io::Error => Io,
}

// --- Environment Errors ---

/// Errors raised by the environment model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// Two mutations of the same variable disagree on the join separator.
    #[error(
        "cannot compose '{name}': base separator '{base}' conflicts with overlay separator '{overlay}'"
    )]
    SeparatorConflict {
        name: String,
        base: String,
        overlay: String,
    },

    /// Name cannot be written safely into every script dialect.
    #[error("invalid environment variable name '{name}' (expected [A-Za-z_][A-Za-z0-9_]*)")]
    InvalidName { name: String },

    /// Variable is not declared in the environment.
    #[error("environment variable '{name}' is not defined")]
    NotDefined { name: String },

    /// Variable is explicitly unset.
    #[error("environment variable '{name}' is unset")]
    Unset { name: String },
}

// --- Subsystem Errors ---

/// Errors raised by the subsystem path translator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubsystemError {
    /// Unrecognised subsystem identifier.
    #[error(
        "unknown subsystem '{id}' (expected one of: windows, msys2, msys, cygwin, wsl, sfu, none)"
    )]
    Unknown { id: String },
}

// --- Profile Errors ---

/// Errors raised while parsing profile environment text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    /// Line does not contain a recognised operator.
    #[error("bad environment definition at line {line}: '{text}'")]
    BadDefinition { line: usize, text: String },

    /// Package pattern is not a valid glob.
    #[error("invalid package pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sources could not be read, parsed or deserialized.
    #[error("failed to load configuration from {sources}: {message}")]
    ParseError { sources: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Script could not be written.
    #[error("failed to write '{path}': {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Output directory could not be created.
    #[error("failed to create directory '{path}': {source}")]
    CreateDirFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
