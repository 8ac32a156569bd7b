// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Activation/deactivation script serializers.
//!
//! ```text
//! EnvVars::save_{sh,bat,ps1}(path)
//!   1. deactivate_<name>  <- no-op companion (written first)
//!   2. <name>             <- capture block + one statement per variable
//!
//! capture block (runs at activation time):
//!   for each touched var:
//!     defined   -> deactivate_<name> += restore assignment
//!     undefined -> deactivate_<name> += unset/removal
//!
//! ScriptDialect: Sh (POSIX) | Bat (cmd.exe) | Ps1 (PowerShell)
//! ```
//!
//! Files are replaced atomically (temp file + rename in the same directory).

mod bat;
mod ps1;
mod sh;


pub use bat::Bat;
pub use ps1::Ps1;
pub use sh::Sh;

pub(crate) use ps1::escape as ps1_escape;
pub(crate) use sh::escape as sh_escape;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tempfile::NamedTempFile;
use tracing::{debug, info, trace};

use super::aggregate::EnvScriptRegistry;
use super::item::{EnvKind, RenderedValue};
use super::vars::EnvVars;
use crate::error::{ConfigError, EnvError, FsError, ToolenvResult};
use crate::subsystem::Subsystem;

/// Script file flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptFormat {
    Sh,
    Bat,
    Ps1,
}

impl ScriptFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Sh => "sh",
            Self::Bat => "bat",
            Self::Ps1 => "ps1",
        }
    }

    /// Default format for a subsystem: `.bat` on native Windows, `.sh` elsewhere.
    #[must_use]
    pub const fn deduce(subsystem: Subsystem) -> Self {
        match subsystem {
            Subsystem::Windows => Self::Bat,
            _ => Self::Sh,
        }
    }

    #[must_use]
    pub fn dialect(self) -> &'static dyn ScriptDialect {
        match self {
            Self::Sh => &Sh,
            Self::Bat => &Bat,
            Self::Ps1 => &Ps1,
        }
    }

    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for ScriptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ScriptFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sh" => Ok(Self::Sh),
            "bat" => Ok(Self::Bat),
            "ps1" => Ok(Self::Ps1),
            _ => Err(ConfigError::InvalidValue {
                section: "scripts".to_string(),
                key: "formats".to_string(),
                message: format!("expected 'sh', 'bat' or 'ps1', got '{s}'"),
            }),
        }
    }
}

/// Shell grammar used to write one script pair.
pub trait ScriptDialect: Sync {
    fn format(&self) -> ScriptFormat;

    fn newline(&self) -> &'static str {
        "\n"
    }

    /// Bytes written before the content.
    fn bom(&self) -> &'static [u8] {
        &[]
    }

    /// Lines opening every activation script.
    fn preamble(&self) -> Vec<String> {
        Vec::new()
    }

    /// Self-reference to the variable's current value.
    fn reference(&self, name: &str) -> String;

    /// Statement giving `name` the rendered value (define, clean or mutate).
    fn render_assign(&self, name: &str, value: &RenderedValue) -> String;

    /// Statement removing `name`.
    fn render_unset(&self, name: &str) -> String;

    /// Lines that, when run, record how to restore `names` into `deactivate`.
    ///
    /// `deactivate` is the absolute location of the deactivation script,
    /// already translated for the target subsystem where that matters.
    fn render_capture_block(&self, names: &[&str], deactivate: &ScriptLocation) -> Vec<String>;

    /// Content of the deactivation script before any activation ran.
    fn render_deactivate_stub(&self) -> Vec<String>;
}

/// Where a script lives, as seen from the generating host and from the target shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLocation {
    /// File name, relative to the script directory.
    pub file_name: String,
    /// Absolute path in the target shell's syntax.
    pub target_path: String,
}

/// Paths of a written activation script and its deactivation companion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPair {
    pub activate: PathBuf,
    pub deactivate: Option<PathBuf>,
}

/// Options for [`EnvVars::save_script`].
#[derive(Debug, Clone, bon::Builder)]
pub struct ScriptOptions {
    #[builder(into, default = PathBuf::from("."))]
    output_dir: PathBuf,
    #[builder(default)]
    formats: Vec<ScriptFormat>,
    #[builder(default = true)]
    deactivate: bool,
    #[builder(into, default = "build".to_string())]
    group: String,
}

impl ScriptOptions {
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn formats(&self) -> &[ScriptFormat] {
        &self.formats
    }

    #[must_use]
    pub const fn deactivate(&self) -> bool {
        self.deactivate
    }

    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }
}

impl EnvVars {
    /// Writes a Windows batch activation script (and its deactivation companion).
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidName`] before writing anything if a name
    /// cannot be written into a script, or [`FsError`] if either file cannot
    /// be written.
    pub fn save_bat(
        &self,
        path: impl AsRef<Path>,
        generate_deactivate: bool,
    ) -> ToolenvResult<ScriptPair> {
        save_with(&Bat, self, path.as_ref(), generate_deactivate)
    }

    /// Writes a POSIX shell activation script (and its deactivation companion).
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidName`] before writing anything if a name
    /// cannot be written into a script, or [`FsError`] if either file cannot
    /// be written.
    pub fn save_sh(
        &self,
        path: impl AsRef<Path>,
        generate_deactivate: bool,
    ) -> ToolenvResult<ScriptPair> {
        save_with(&Sh, self, path.as_ref(), generate_deactivate)
    }

    /// Writes a `PowerShell` activation script (and its deactivation companion).
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidName`] before writing anything if a name
    /// cannot be written into a script, or [`FsError`] if either file cannot
    /// be written.
    pub fn save_ps1(
        &self,
        path: impl AsRef<Path>,
        generate_deactivate: bool,
    ) -> ToolenvResult<ScriptPair> {
        save_with(&Ps1, self, path.as_ref(), generate_deactivate)
    }

    /// Writes `<name>.<ext>` for every configured format and registers the
    /// activation scripts under the options' group.
    ///
    /// With no formats configured the format is deduced from the subsystem.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidName`] for a name that cannot be written
    /// into a script, or [`FsError`] if a script cannot be written.
    pub fn save_script(
        &self,
        name: &str,
        options: &ScriptOptions,
        registry: &mut EnvScriptRegistry,
    ) -> ToolenvResult<Vec<ScriptPair>> {
        let formats = if options.formats.is_empty() {
            vec![ScriptFormat::deduce(self.subsystem())]
        } else {
            options.formats.clone()
        };

        let mut pairs = Vec::with_capacity(formats.len());
        for format in formats {
            let path = options
                .output_dir
                .join(format!("{name}.{}", format.extension()));
            let pair = save_with(format.dialect(), self, &path, options.deactivate)?;
            registry.register(&options.group, &pair);
            pairs.push(pair);
        }
        Ok(pairs)
    }

    /// Renders the activation script content for `dialect` without writing it.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidName`] if a declared name cannot be written
    /// into a script.
    pub fn render_script(
        &self,
        dialect: &dyn ScriptDialect,
        deactivate: Option<&ScriptLocation>,
    ) -> Result<String, EnvError> {
        self.environment().validate_names()?;
        let subsystem = self.subsystem();
        let touched: Vec<(&str, _)> = self
            .declared()
            .filter(|(_, item)| !item.is_noop())
            .collect();

        let mut lines = dialect.preamble();
        if let Some(location) = deactivate
            && !touched.is_empty()
        {
            let names: Vec<&str> = touched.iter().map(|(name, _)| *name).collect();
            lines.extend(dialect.render_capture_block(&names, location));
        }

        for (name, item) in touched {
            let line = match item.kind() {
                EnvKind::Unset => dialect.render_unset(name),
                EnvKind::Define | EnvKind::Clean | EnvKind::Mutate => {
                    dialect.render_assign(name, &item.render_parts(subsystem))
                }
            };
            trace!(name = %name, line = %line, "rendered statement");
            lines.push(line);
        }

        Ok(join_lines(dialect, &lines))
    }
}

fn join_lines(dialect: &dyn ScriptDialect, lines: &[String]) -> String {
    let newline = dialect.newline();
    let mut content = lines
        .iter()
        .flat_map(|line| line.split('\n'))
        .collect::<Vec<_>>()
        .join(newline);
    content.push_str(newline);
    content
}

/// Location of the deactivation companion of `path`.
#[must_use]
pub fn deactivate_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("deactivate_{file_name}"))
}

fn save_with(
    dialect: &dyn ScriptDialect,
    vars: &EnvVars,
    path: &Path,
    generate_deactivate: bool,
) -> ToolenvResult<ScriptPair> {
    vars.environment().validate_names()?;
    let dir = parent_dir(path);
    std::fs::create_dir_all(&dir).map_err(|source| FsError::CreateDirFailed {
        path: dir.display().to_string(),
        source,
    })?;

    let deactivate = if generate_deactivate {
        let deactivate = deactivate_path(path);
        let stub = join_lines(dialect, &dialect.render_deactivate_stub());
        write_atomic(&deactivate, dialect.bom(), &stub)?;
        debug!(path = %deactivate.display(), "wrote deactivation script");
        Some(deactivate)
    } else {
        None
    };

    let location = deactivate.as_deref().map(|p| ScriptLocation {
        file_name: p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        target_path: vars
            .subsystem()
            .translate(&absolute(p).to_string_lossy()),
    });

    let content = vars.render_script(dialect, location.as_ref())?;
    write_atomic(path, dialect.bom(), &content)?;
    info!(
        path = %path.display(),
        format = %dialect.format(),
        subsystem = %vars.subsystem(),
        "wrote activation script"
    );

    Ok(ScriptPair {
        activate: path.to_path_buf(),
        deactivate,
    })
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Replaces `path` with `bom` + `content`, never leaving a partial file behind.
pub(crate) fn write_atomic(path: &Path, bom: &[u8], content: &str) -> Result<(), FsError> {
    let write_failed = |source| FsError::WriteFailed {
        path: path.display().to_string(),
        source,
    };

    let mut file = NamedTempFile::new_in(parent_dir(path)).map_err(write_failed)?;
    file.write_all(bom).map_err(write_failed)?;
    file.write_all(content.as_bytes()).map_err(write_failed)?;
    file.as_file().sync_all().map_err(write_failed)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(write_failed)?;
    }

    file.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}
