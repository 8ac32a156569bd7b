// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `subsystem-path` command implementation.

use crate::cli::generate::SubsystemPathArgs;
use crate::error::Result;
use crate::subsystem::translate_path;

/// Prints each path translated for the requested subsystem, one per line.
///
/// # Errors
///
/// Returns an error naming the identifier if the subsystem is unknown.
pub fn run_subsystem_path_command(args: &SubsystemPathArgs) -> Result<()> {
    for path in &args.paths {
        println!("{}", translate_path(&args.subsystem, path)?);
    }
    Ok(())
}
