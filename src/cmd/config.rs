// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands.

use crate::config::Config;

/// Display the configuration files in load order, then every option.
pub fn run_options_command(config: &Config, config_files: &[String]) {
    if config_files.is_empty() {
        println!("# no configuration files loaded");
    } else {
        for line in config_files {
            println!("# {line}");
        }
    }
    for line in config.format_options() {
        println!("{line}");
    }
}
