// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Generate | Show | SubsystemPath | Options | Version
//! ```

use std::path::Path;
use std::process::ExitCode;

use toolenv::cli::{self, Command};
use toolenv::cmd::config::run_options_command;
use toolenv::cmd::generate::{run_generate_command, run_show_command};
use toolenv::cmd::subsystem::run_subsystem_path_command;
use toolenv::config::Config;
use toolenv::config::loader::ConfigLoader;
use toolenv::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const DEFAULT_CONFIG: &str = "toolenv.toml";
const ENV_PREFIX: &str = "TOOLENV";

fn main() -> ExitCode {
    let cli = cli::parse();

    // Commands that need no configuration.
    match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            return ExitCode::SUCCESS;
        }
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            return ExitCode::FAILURE;
        }
        _ => {}
    }

    let loader = match build_config_loader(&cli) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let loaded_files = loader.format_loaded_files();
    let config = match loader.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&build_log_config(&config)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config, &loaded_files)
}

fn build_log_config(config: &Config) -> LogConfig {
    let log_file = config.global.log_file.as_deref();
    let json_file = log_file
        .and_then(Path::extension)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(log_file.map(|p| p.display().to_string()))
        .with_json_file(json_file)
        .build()
}

fn dispatch_command(cli: &cli::Cli, config: &Config, loaded_files: &[String]) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Options) => {
            run_options_command(config, loaded_files);
            Ok(())
        }
        Some(Command::Generate(args)) => run_generate_command(args, config),
        Some(Command::Show(args)) => run_show_command(args, config),
        Some(Command::SubsystemPath(args)) => run_subsystem_path_command(args),
        Some(Command::Version) | None => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

/// Layers `toolenv.toml`, `--config` files, `TOOLENV_*` variables, then
/// global and command-line overrides.
fn build_config_loader(cli: &cli::Cli) -> toolenv::error::Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !cli.global.no_default_config {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG);
    }
    for path in &cli.global.configs {
        loader = loader.add_toml_file(path);
    }

    let mut overrides = cli.global.to_config_overrides();
    match &cli.command {
        Some(Command::Generate(args)) => overrides.extend(args.to_config_overrides()),
        Some(Command::Show(args)) => overrides.extend(args.source.to_config_overrides()),
        _ => {}
    }

    loader.with_env_prefix(ENV_PREFIX).apply_overrides(&overrides)
}
