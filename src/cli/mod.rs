// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! toolenv [global options] <command>
//! generate [-p profile]... [-e line]... [-f fmt]... [-o dir]
//! show [--resolved] [-p profile]... [-r ref]
//! subsystem-path <subsystem> <path>...
//! options
//! version
//! ```

pub mod generate;
pub mod global;


use crate::cli::generate::{GenerateArgs, ShowArgs, SubsystemPathArgs};
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// Toolchain environment script generator.
///
/// Composes layered environment-variable operations and writes
/// activation/deactivation scripts for sh, cmd.exe and `PowerShell`.
#[derive(Debug, Parser)]
#[command(
    name = "toolenv",
    author,
    version,
    about = "Toolchain Environment Script Generator",
    long_about = "toolenv Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Composes toolchain flags and profile environment lines into\n\
                  activation scripts (sh, bat, ps1). Each activation script\n\
                  writes a deactivate_<name> script that restores the shell\n\
                  to the state it had before activation.",
    after_help = "CONFIG FILES:\n\n\
                  toolenv reads `toolenv.toml` from the current directory if it\n\
                  exists, then every file given with --config, then TOOLENV_*\n\
                  environment variables (TOOLENV_SCRIPTS__SUBSYSTEM=msys2), then\n\
                  --set overrides. Use --no-default-config to skip toolenv.toml."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all options and their values.
    Options,

    /// Writes activation/deactivation scripts.
    Generate(GenerateArgs),

    /// Prints the composed environment.
    Show(ShowArgs),

    /// Translates native Windows paths for a subsystem.
    #[command(name = "subsystem-path")]
    SubsystemPath(SubsystemPathArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
