// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML files and override layering.

use std::path::PathBuf;

use tempfile::TempDir;
use toolenv::config::Config;
use toolenv::config::loader::ConfigLoader;
use toolenv::env::ScriptFormat;
use toolenv::logging::LogLevel;
use toolenv::subsystem::Subsystem;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

// =============================================================================
// Loading from files
// =============================================================================

#[test]
fn config_from_file() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "toolenv.toml",
        r#"
[scripts]
subsystem = "cygwin"
profiles = ["base.env", "ci.env"]

[toolchain]
cxx = "clang++"
pkg_config_dirs = ["/opt/lib/pkgconfig"]
"#,
    );

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.scripts.subsystem, Subsystem::Cygwin);
    assert_eq!(
        config.scripts.profiles,
        [PathBuf::from("base.env"), PathBuf::from("ci.env")]
    );
    assert_eq!(config.toolchain.cxx.as_deref(), Some("clang++"));
    assert_eq!(
        config.toolchain.pkg_config_dirs,
        [PathBuf::from("/opt/lib/pkgconfig")]
    );
}

#[test]
fn config_missing_required_file_fails() {
    let temp = TempDir::new().unwrap();
    let result = Config::from_file(temp.path().join("absent.toml"));
    assert!(result.is_err());
}

#[test]
fn config_missing_optional_file_is_skipped() {
    let temp = TempDir::new().unwrap();
    let loader = ConfigLoader::new().add_toml_file_optional(temp.path().join("absent.toml"));
    assert!(loader.loaded_files().is_empty());

    let config = loader.build().unwrap();
    assert_eq!(config.scripts.group, "build");
}

#[test]
fn config_invalid_toml_fails() {
    let result = Config::parse("[scripts\nsubsystem = ");
    assert!(result.is_err());
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn config_later_files_override_earlier() {
    let temp = TempDir::new().unwrap();
    let base = write(
        &temp,
        "base.toml",
        "[scripts]\nsubsystem = \"msys2\"\ngroup = \"base\"\n",
    );
    let local = write(&temp, "local.toml", "[scripts]\ngroup = \"local\"\n");

    let loader = ConfigLoader::new().add_toml_file(&base).add_toml_file(&local);
    assert_eq!(loader.loaded_files().len(), 2);

    let config = loader.build().unwrap();
    assert_eq!(config.scripts.subsystem, Subsystem::Msys2);
    assert_eq!(config.scripts.group, "local");
}

#[test]
fn config_overrides_beat_files() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "toolenv.toml",
        "[global]\noutput_log_level = 1\n[scripts]\nformats = [\"bat\"]\n",
    );

    let config = ConfigLoader::new()
        .add_toml_file(&path)
        .apply_overrides(&[
            "global/output_log_level=4",
            "scripts/formats=sh, ps1",
            "toolchain/defines=A,B=1",
        ])
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert_eq!(config.scripts.formats, [ScriptFormat::Sh, ScriptFormat::Ps1]);
    assert_eq!(config.toolchain.defines, ["A", "B=1"]);
}

#[test]
fn config_malformed_override_rejected() {
    let result = ConfigLoader::new().apply_overrides(&["scripts.group=x"]);
    assert!(result.is_err());

    let result = ConfigLoader::new().apply_overrides(&["scripts/group"]);
    assert!(result.is_err());
}

#[test]
fn config_loaded_files_are_listed_in_order() {
    let temp = TempDir::new().unwrap();
    let first = write(&temp, "a.toml", "");
    let second = write(&temp, "b.toml", "");

    let lines = ConfigLoader::new()
        .add_toml_file(&first)
        .add_toml_file_optional(&second)
        .format_loaded_files();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("1. [file] "));
    assert!(lines[0].ends_with("a.toml"));
    assert!(lines[1].starts_with("2. [optional] "));
    assert!(lines[1].ends_with("b.toml"));
}

#[test]
fn config_options_listing_reflects_values() {
    let config = Config::parse("[toolchain]\ncflags = [\"-O2\", \"-g\"]\n").unwrap();
    let options = config.format_options();

    assert!(
        options
            .iter()
            .any(|line| line.starts_with("toolchain.cflags") && line.ends_with("= -O2, -g")),
        "{options:#?}"
    );
    assert!(
        options
            .iter()
            .any(|line| line.starts_with("scripts.group") && line.ends_with("= build"))
    );
}
