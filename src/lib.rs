// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |        generate / show / options
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, layered settings  |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!            toolchain     profile   subsystem
//!            CC/CFLAGS    [env] lines  path translation
//!                 |           |        |
//!                 +-----+-----+--------+
//!                       v
//!     ,-----------------------------------------,
//!     |  env   Environment -> EnvVars -> scripts |
//!     |        sh / bat / ps1, aggregate        |
//!     '-----------------------------------------'
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod profile;
pub mod subsystem;
pub mod toolchain;
