// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the CLI.
//!
//! Parses realistic argument patterns, then runs the built binary against
//! a temporary directory.

use std::path::Path;
use std::process::{Command, Output};

use clap::Parser;
use tempfile::TempDir;
use toolenv::cli::{Cli, Command as CliCommand};

fn toolenv(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_toolenv"))
        .args(args)
        .current_dir(dir)
        .env_remove("TOOLENV_SCRIPTS__SUBSYSTEM")
        .env_remove("TOOLENV_SCRIPTS__GROUP")
        .output()
        .expect("toolenv binary should run")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "toolenv failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn cli_no_command() {
    let cli = Cli::try_parse_from(["toolenv"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn cli_show_resolved_with_reference() {
    let cli = Cli::try_parse_from([
        "toolenv",
        "show",
        "--resolved",
        "-r",
        "zlib/1.3",
        "-p",
        "base.env",
        "-p",
        "ci.env",
    ])
    .unwrap();

    let Some(CliCommand::Show(args)) = cli.command else {
        panic!("expected show command");
    };
    assert!(args.resolved);
    assert_eq!(args.source.reference.as_deref(), Some("zlib/1.3"));
    assert_eq!(args.source.profiles.len(), 2);
}

#[test]
fn cli_subsystem_path_requires_paths() {
    let result = Cli::try_parse_from(["toolenv", "subsystem-path", "msys2"]);
    assert!(result.is_err());
}

#[test]
fn cli_unknown_format_rejected() {
    let result = Cli::try_parse_from(["toolenv", "generate", "-f", "fish"]);
    assert!(result.is_err());
}

// =============================================================================
// Binary
// =============================================================================

#[test]
fn bin_version() {
    let temp = TempDir::new().unwrap();
    let out = stdout(&toolenv(temp.path(), &["version"]));
    assert_eq!(out.trim(), env!("CARGO_PKG_VERSION"));
}

#[test]
fn bin_subsystem_path() {
    let temp = TempDir::new().unwrap();
    let out = stdout(&toolenv(
        temp.path(),
        &["subsystem-path", "cygwin", r"C:\Users\dev", r"D:\work"],
    ));
    insta::assert_snapshot!(out.trim_end(), @r"
    /cygdrive/c/users/dev
    /cygdrive/d/work
    ");
}

#[test]
fn bin_subsystem_path_unknown_subsystem_fails() {
    let temp = TempDir::new().unwrap();
    let output = toolenv(temp.path(), &["subsystem-path", "beos", r"C:\a"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("beos"));
}

#[test]
fn bin_show_composes_profile_and_flags() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("base.env"), "CC=clang\nPATH=+(path)/opt/bin\n").unwrap();

    let out = stdout(&toolenv(
        temp.path(),
        &[
            "--no-default-config",
            "show",
            "--cc",
            "gcc",
            "-D",
            "NDEBUG",
            "-p",
            "base.env",
            "-e",
            "TMP=!",
        ],
    ));
    insta::assert_snapshot!(out.trim_end(), @r"
    CC=clang
    CPPFLAGS+=-DNDEBUG
    PATH=+(path)/opt/bin
    TMP=!
    ");
}

#[test]
fn bin_generate_writes_scripts_and_launchers() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("toolenv.toml"),
        "[scripts]\nformats = [\"sh\", \"ps1\"]\noutput_dir = \"env\"\n",
    )
    .unwrap();

    let out = stdout(&toolenv(
        temp.path(),
        &["generate", "-n", "conanbuildenv", "-e", "FOO=bar"],
    ));
    assert_eq!(out.lines().count(), 8, "{out}");

    let env_dir = temp.path().join("env");
    for name in [
        "conanbuildenv.sh",
        "deactivate_conanbuildenv.sh",
        "conanbuildenv.ps1",
        "deactivate_conanbuildenv.ps1",
        "toolenvbuild.sh",
        "deactivate_toolenvbuild.sh",
        "toolenvbuild.ps1",
        "deactivate_toolenvbuild.ps1",
    ] {
        assert!(env_dir.join(name).is_file(), "missing {name}");
    }

    let script = std::fs::read_to_string(env_dir.join("conanbuildenv.sh")).unwrap();
    assert!(script.contains("export FOO=\"bar\""), "{script}");
}

#[test]
fn bin_generate_no_aggregate_no_deactivate() {
    let temp = TempDir::new().unwrap();
    let out = stdout(&toolenv(
        temp.path(),
        &[
            "--no-default-config",
            "generate",
            "-f",
            "bat",
            "--no-deactivate",
            "--no-aggregate",
            "-e",
            "FOO=bar",
        ],
    ));

    assert_eq!(out.lines().count(), 1, "{out}");
    assert!(temp.path().join("toolenvbuildenv.bat").is_file());
    assert!(!temp.path().join("deactivate_toolenvbuildenv.bat").exists());
    assert!(!temp.path().join("toolenvbuild.bat").exists());
}

#[test]
fn bin_generate_bad_env_line_fails() {
    let temp = TempDir::new().unwrap();
    let output = toolenv(temp.path(), &["generate", "-e", "no operator here"]);
    assert!(!output.status.success());
    assert!(!temp.path().join("toolenvbuildenv.sh").exists());
}

#[test]
fn bin_options_lists_loaded_files() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("toolenv.toml"), "[scripts]\ngroup = \"ci\"\n").unwrap();

    let out = stdout(&toolenv(temp.path(), &["options", "-s", "toolchain/cc=cc"]));
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("# 1. [optional] "), "{out}");
    assert!(lines.iter().any(|l| l.starts_with("scripts.group") && l.ends_with("= ci")));
    assert!(lines.iter().any(|l| l.starts_with("toolchain.cc") && l.ends_with("= cc")));
}

#[test]
fn bin_show_resolved_json() {
    let temp = TempDir::new().unwrap();
    let out = stdout(&toolenv(
        temp.path(),
        &[
            "--no-default-config",
            "show",
            "--resolved",
            "--json",
            "-e",
            "TOOLENV_TEST_A=one two",
            "-e",
            "TOOLENV_TEST_B=!",
        ],
    ));

    let document: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(document["variables"]["TOOLENV_TEST_A"], "one two");
    assert_eq!(document["unset"], serde_json::json!(["TOOLENV_TEST_B"]));
}

#[cfg(unix)]
#[test]
fn bin_show_resolved_skips_non_utf8_variables() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_toolenv"))
        .args([
            "--no-default-config",
            "show",
            "--resolved",
            "-e",
            "BAD_BYTES+=tail",
            "-e",
            "TOOLENV_TEST_C=c",
        ])
        .current_dir(temp.path())
        .env_remove("TOOLENV_SCRIPTS__SUBSYSTEM")
        .env_remove("TOOLENV_SCRIPTS__GROUP")
        .env("BAD_BYTES", OsStr::from_bytes(b"\xff"))
        .output()
        .expect("toolenv binary should run");

    let out = stdout(&output);
    insta::assert_snapshot!(out.trim_end(), @r"
    BAD_BYTES=tail
    TOOLENV_TEST_C=c
    ");
}

#[test]
fn bin_generate_rejects_unsafe_variable_name() {
    let temp = TempDir::new().unwrap();
    let output = toolenv(
        temp.path(),
        &["--no-default-config", "generate", "-e", "X;touch pwned;Y=2"],
    );
    assert!(!output.status.success());
    assert!(!temp.path().join("toolenvbuildenv.sh").exists());
    assert!(!temp.path().join("pwned").exists());
}
