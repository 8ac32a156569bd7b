// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments for `generate`, `show` and `subsystem-path`.
//!
//! # Environment Layers
//!
//! ```text
//! [toolchain] config + --cc/--cxx/-D/--cflag/...   (lowest)
//! scripts.profiles + --profile FILE, in order
//! --env 'NAME+=value' lines                         (highest)
//! ```

use clap::{ArgAction, Args};
use std::path::PathBuf;

use crate::env::ScriptFormat;
use crate::subsystem::Subsystem;

/// Inputs that build the environment, shared by `generate` and `show`.
#[derive(Debug, Clone, Default, Args)]
pub struct EnvSourceArgs {
    /// Profile file with `[pattern:]NAME<op>value` lines. Can repeat.
    #[arg(short = 'p', long = "profile", value_name = "FILE", action = ArgAction::Append)]
    pub profiles: Vec<PathBuf>,

    /// Package reference used to select profile patterns (e.g. zlib/1.3.1).
    #[arg(short = 'r', long = "reference", value_name = "REF")]
    pub reference: Option<String>,

    /// Extra profile line applied last, e.g. 'PATH=+(path)/opt/bin'. Can repeat.
    #[arg(short = 'e', long = "env", value_name = "LINE", action = ArgAction::Append)]
    pub env_lines: Vec<String>,

    /// C compiler (CC).
    #[arg(long, value_name = "PROGRAM")]
    pub cc: Option<String>,

    /// C++ compiler (CXX).
    #[arg(long, value_name = "PROGRAM")]
    pub cxx: Option<String>,

    /// Preprocessor definition added to CPPFLAGS as -D<DEF>. Can repeat.
    #[arg(short = 'D', long = "define", value_name = "DEF", action = ArgAction::Append)]
    pub defines: Vec<String>,

    /// Flag appended to CFLAGS. Can repeat.
    #[arg(
        long = "cflag",
        value_name = "FLAG",
        allow_hyphen_values = true,
        action = ArgAction::Append
    )]
    pub cflags: Vec<String>,

    /// Flag appended to CXXFLAGS. Can repeat.
    #[arg(
        long = "cxxflag",
        value_name = "FLAG",
        allow_hyphen_values = true,
        action = ArgAction::Append
    )]
    pub cxxflags: Vec<String>,

    /// Flag appended to LDFLAGS. Can repeat.
    #[arg(
        long = "ldflag",
        value_name = "FLAG",
        allow_hyphen_values = true,
        action = ArgAction::Append
    )]
    pub ldflags: Vec<String>,

    /// Directory prepended to PKG_CONFIG_PATH. Can repeat.
    #[arg(long = "pkg-config-dir", value_name = "DIR", action = ArgAction::Append)]
    pub pkg_config_dirs: Vec<PathBuf>,

    /// Target subsystem (none, windows, msys2, msys, cygwin, wsl, sfu).
    #[arg(long, value_name = "SUBSYSTEM")]
    pub subsystem: Option<Subsystem>,
}

impl EnvSourceArgs {
    /// Converts arguments to configuration overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        self.subsystem
            .map(|s| format!("scripts/subsystem={s}"))
            .into_iter()
            .collect()
    }
}

/// Arguments for the `generate` command.
#[derive(Debug, Clone, Default, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: EnvSourceArgs,

    /// Script base name; writes <NAME>.sh/.bat/.ps1.
    #[arg(short = 'n', long, value_name = "NAME", default_value = "toolenvbuildenv")]
    pub name: String,

    /// Script format (sh, bat, ps1). Can repeat. Deduced from the subsystem if omitted.
    #[arg(short = 'f', long = "format", value_name = "FORMAT", action = ArgAction::Append)]
    pub formats: Vec<ScriptFormat>,

    /// Directory receiving the scripts.
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skips the deactivate_<NAME> scripts.
    #[arg(long = "no-deactivate")]
    pub no_deactivate: bool,

    /// Launcher group the scripts are registered under.
    #[arg(short = 'g', long, value_name = "GROUP")]
    pub group: Option<String>,

    /// Skips the toolenv<GROUP> launcher scripts.
    #[arg(long = "no-aggregate")]
    pub no_aggregate: bool,
}

impl GenerateArgs {
    /// Converts generate arguments to configuration overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let formats = (!self.formats.is_empty()).then(|| {
            let list: Vec<_> = self.formats.iter().map(ToString::to_string).collect();
            format!("scripts/formats={}", list.join(","))
        });

        self.source
            .to_config_overrides()
            .into_iter()
            .chain(formats)
            .chain(
                self.output_dir
                    .as_ref()
                    .map(|dir| format!("scripts/output_dir={}", dir.display())),
            )
            .chain(self.no_deactivate.then(|| "scripts/deactivate=false".to_string()))
            .chain(self.group.as_ref().map(|g| format!("scripts/group={g}")))
            .collect()
    }
}

/// Arguments for the `show` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: EnvSourceArgs,

    /// Prints values resolved against the current process environment
    /// instead of the pending operations.
    #[arg(long)]
    pub resolved: bool,

    /// Prints the resolved environment as a JSON object.
    #[arg(long, requires = "resolved")]
    pub json: bool,
}

/// Arguments for the `subsystem-path` command.
#[derive(Debug, Clone, Args)]
pub struct SubsystemPathArgs {
    /// Subsystem identifier (none, windows, msys2, msys, cygwin, wsl, sfu).
    #[arg(value_name = "SUBSYSTEM")]
    pub subsystem: String,

    /// Native paths to translate.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<String>,
}
