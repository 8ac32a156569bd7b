// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `generate` and `show` command implementations.

use anyhow::Context;
use tracing::{debug, info};

use crate::cli::generate::{EnvSourceArgs, GenerateArgs, ShowArgs};
use crate::config::Config;
use crate::env::{EnvScriptRegistry, Environment};
use crate::error::Result;
use crate::profile::ProfileEnvironment;
use crate::toolchain::ToolchainFlags;

/// Toolchain flags from `[toolchain]`, extended by command-line flags.
#[must_use]
pub fn toolchain_flags(source: &EnvSourceArgs, config: &Config) -> ToolchainFlags {
    let mut flags = config.toolchain.clone();
    if source.cc.is_some() {
        flags.cc.clone_from(&source.cc);
    }
    if source.cxx.is_some() {
        flags.cxx.clone_from(&source.cxx);
    }
    flags.defines.extend(source.defines.iter().cloned());
    flags.cflags.extend(source.cflags.iter().cloned());
    flags.cxxflags.extend(source.cxxflags.iter().cloned());
    flags.ldflags.extend(source.ldflags.iter().cloned());
    flags.pkg_config_dirs.extend(source.pkg_config_dirs.iter().cloned());
    flags
}

/// Composes toolchain flags, profile files and `--env` lines, lowest priority first.
///
/// # Errors
///
/// Returns an error if a profile cannot be read or parsed, or if two layers
/// mutate a variable with different separators.
pub fn build_environment(source: &EnvSourceArgs, config: &Config) -> Result<Environment> {
    let toolchain = toolchain_flags(source, config).environment();

    let mut profile = ProfileEnvironment::new();
    for path in config.scripts.profiles.iter().chain(&source.profiles) {
        let layer = ProfileEnvironment::load_file(path)
            .with_context(|| format!("failed to load profile {}", path.display()))?;
        profile = profile.compose(&layer)?;
        debug!(path = %path.display(), "profile layered");
    }
    if !source.env_lines.is_empty() {
        let lines = ProfileEnvironment::loads(&source.env_lines.join("\n"))
            .context("invalid --env line")?;
        profile = profile.compose(&lines)?;
    }

    let selected = profile.env_for(source.reference.as_deref())?;
    Ok(toolchain.compose(&selected)?)
}

/// Main handler for the generate command.
///
/// # Errors
///
/// Returns an error if the environment cannot be built or a script cannot be written.
pub fn run_generate_command(args: &GenerateArgs, config: &Config) -> Result<()> {
    let env = build_environment(&args.source, config)?;
    if env.is_empty() {
        tracing::warn!("environment is empty; scripts will only restore state");
    }

    let vars = env.vars(config.scripts.subsystem);
    let options = config.scripts.script_options();
    let mut registry = EnvScriptRegistry::new();

    let pairs = vars.save_script(&args.name, &options, &mut registry)?;
    for pair in &pairs {
        println!("{}", pair.activate.display());
        if let Some(deactivate) = &pair.deactivate {
            println!("{}", deactivate.display());
        }
    }

    if !args.no_aggregate {
        let launchers = registry.generate_aggregated(options.output_dir(), vars.subsystem())?;
        for launcher in &launchers {
            println!("{}", launcher.display());
        }
    }

    info!(
        name = %args.name,
        variables = env.len(),
        scripts = pairs.len(),
        "generated environment scripts"
    );
    Ok(())
}

/// Main handler for the show command.
///
/// # Errors
///
/// Returns an error if the environment cannot be built.
pub fn run_show_command(args: &ShowArgs, config: &Config) -> Result<()> {
    let env = build_environment(&args.source, config)?;

    if !args.resolved {
        let dump = env.dumps();
        if !dump.is_empty() {
            println!("{dump}");
        }
        return Ok(());
    }

    let vars = env.vars(config.scripts.subsystem);
    if args.json {
        let variables: serde_json::Map<String, serde_json::Value> = vars
            .items()
            .map(|(name, value)| (name.to_string(), serde_json::Value::String(value)))
            .collect();
        let unset: Vec<&str> = vars.unset_names().collect();
        let document = serde_json::json!({ "variables": variables, "unset": unset });
        println!(
            "{}",
            serde_json::to_string_pretty(&document).context("failed to serialize environment")?
        );
        return Ok(());
    }

    for (name, value) in vars.items() {
        println!("{name}={value}");
    }
    for name in vars.unset_names() {
        println!("{name}=!");
    }
    Ok(())
}
