// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Group launchers: one script per group that activates every registered script.
//!
//! ```text
//! registry["build"] = [a.sh, b.sh, c.bat]
//!
//! toolenvbuild.sh             . "a.sh" && . "b.sh"
//! deactivate_toolenvbuild.sh  . "deactivate_b.sh" && . "deactivate_a.sh"
//! toolenvbuild.bat            call "%~dp0c.bat"
//! ```
//!
//! Deactivation launchers only chain scripts written with a deactivation
//! companion, and are skipped when no member has one.


use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::scripts::{ScriptFormat, ScriptPair, deactivate_path, write_atomic};
use crate::error::ToolenvResult;
use crate::subsystem::Subsystem;

/// Scripts written so far, grouped by launcher name.
#[derive(Debug, Clone, Default)]
pub struct EnvScriptRegistry {
    groups: IndexMap<String, Vec<ScriptPair>>,
}

impl EnvScriptRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `pair` under `group`.
    ///
    /// Re-registering an activation script keeps its position and takes the
    /// newer deactivation companion.
    pub fn register(&mut self, group: &str, pair: &ScriptPair) {
        let scripts = self.groups.entry(group.to_string()).or_default();
        match scripts.iter_mut().find(|p| p.activate == pair.activate) {
            Some(existing) => existing.deactivate.clone_from(&pair.deactivate),
            None => scripts.push(pair.clone()),
        }
    }

    #[must_use]
    pub fn scripts(&self, group: &str) -> &[ScriptPair] {
        self.groups.get(group).map_or(&[], Vec::as_slice)
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    /// Writes `toolenv<group>.<ext>` launchers into `output_dir`, one per
    /// group and script format, plus their deactivation counterparts.
    ///
    /// Deactivation launchers run the per-script deactivators in reverse order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FsError`] if a launcher cannot be written.
    pub fn generate_aggregated(
        &self,
        output_dir: &Path,
        subsystem: Subsystem,
    ) -> ToolenvResult<Vec<PathBuf>> {
        let mut written = Vec::new();

        for (group, scripts) in &self.groups {
            for format in [ScriptFormat::Sh, ScriptFormat::Bat, ScriptFormat::Ps1] {
                let members: Vec<&ScriptPair> = scripts
                    .iter()
                    .filter(|p| ScriptFormat::from_path(&p.activate) == Some(format))
                    .collect();
                if members.is_empty() {
                    continue;
                }

                let launcher = output_dir.join(format!("toolenv{group}.{}", format.extension()));
                let activators = members.iter().map(|p| &p.activate);
                let activate = launcher_content(format, output_dir, subsystem, activators);
                write_launcher(format, &launcher, &activate)?;
                written.push(launcher.clone());

                let deactivators: Vec<&PathBuf> = members
                    .iter()
                    .rev()
                    .filter_map(|p| p.deactivate.as_ref())
                    .collect();
                if deactivators.is_empty() {
                    debug!(group = %group, format = %format, "no deactivation scripts to chain");
                } else {
                    let deactivate =
                        launcher_content(format, output_dir, subsystem, deactivators.into_iter());
                    let deactivate_launcher = deactivate_path(&launcher);
                    write_launcher(format, &deactivate_launcher, &deactivate)?;
                    written.push(deactivate_launcher);
                }

                info!(
                    group = %group,
                    format = %format,
                    scripts = members.len(),
                    "wrote group launcher"
                );
            }
        }

        Ok(written)
    }
}

fn write_launcher(format: ScriptFormat, path: &Path, content: &str) -> ToolenvResult<()> {
    let dialect = format.dialect();
    write_atomic(path, dialect.bom(), content)?;
    debug!(path = %path.display(), "wrote launcher");
    Ok(())
}

/// Path of `script` relative to `dir` when it lives there, absolute otherwise.
fn relative_to(dir: &Path, script: &Path) -> (bool, String) {
    match script.strip_prefix(dir) {
        Ok(rel) => (true, rel.to_string_lossy().into_owned()),
        Err(_) => (false, script.to_string_lossy().into_owned()),
    }
}

fn launcher_content<'a>(
    format: ScriptFormat,
    output_dir: &Path,
    subsystem: Subsystem,
    scripts: impl Iterator<Item = &'a PathBuf>,
) -> String {
    let dialect = format.dialect();
    let newline = dialect.newline();

    match format {
        ScriptFormat::Sh => {
            let sourced: Vec<String> = scripts
                .map(|p| {
                    let abs = std::path::absolute(p).unwrap_or_else(|_| p.clone());
                    let target = subsystem.translate(&abs.to_string_lossy());
                    format!(". \"{}\"", super::scripts::sh_escape(&target))
                })
                .collect();
            format!("{}{newline}", sourced.join(" && "))
        }
        ScriptFormat::Bat => {
            let mut lines = vec!["@echo off".to_string()];
            lines.extend(scripts.map(|p| match relative_to(output_dir, p) {
                (true, rel) => format!("call \"%~dp0{rel}\""),
                (false, abs) => format!("call \"{abs}\""),
            }));
            format!("{}{newline}", lines.join(newline))
        }
        ScriptFormat::Ps1 => {
            let lines: Vec<String> = scripts
                .map(|p| match relative_to(output_dir, p) {
                    (true, rel) => {
                        format!("& \"$PSScriptRoot/{}\"", super::scripts::ps1_escape(&rel))
                    }
                    (false, abs) => format!("& \"{}\"", super::scripts::ps1_escape(&abs)),
                })
                .collect();
            format!("{}{newline}", lines.join(newline))
        }
    }
}
