// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment-variable composition and script generation.
//!
//! ```text
//!  Environment (layer 1)   Environment (layer 2)
//!          \                     /
//!           '--- compose() -----'        later layer = higher priority
//!                    |
//!              Environment
//!                    |
//!             vars(subsystem)
//!                    |
//!                 EnvVars
//!          /         |          \
//!   get/items   apply_to(cmd)   save_sh / save_bat / save_ps1
//!                                    |
//!                             EnvScriptRegistry -> group launchers
//! ```
//!
//! # Modules
//!
//! - [`item`]: one variable's pending mutation (tokens, separator, kind)
//! - [`environment`]: ordered set of items and composition
//! - [`vars`]: rendered view against a target subsystem
//! - [`scripts`]: activation/deactivation script dialects
//! - [`aggregate`]: per-group launcher scripts

pub mod aggregate;
pub mod environment;
pub mod item;
pub mod scripts;
pub mod vars;

#[cfg(test)]
mod tests;

pub use aggregate::EnvScriptRegistry;
pub use environment::Environment;
pub use item::{
    EnvItem, EnvKind, EnvToken, EnvValues, RenderedValue, Separator, is_valid_name,
};
pub use scripts::{Bat, Ps1, ScriptDialect, ScriptFormat, ScriptOptions, ScriptPair, Sh};
pub use vars::{EnvVars, LiveEnv};
