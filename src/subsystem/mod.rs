// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! POSIX-compatibility subsystems and native path translation.
//!
//! ```text
//! Subsystem: None | Windows | Msys2 | Msys | Cygwin | Wsl | Sfu
//!
//! C:\Users\Dev\lib
//!   windows/none -> C:\Users\Dev\lib
//!   msys2/msys   -> /c/users/dev/lib
//!   cygwin       -> /cygdrive/c/users/dev/lib
//!   wsl          -> /mnt/c/Users/Dev/lib
//!   sfu          -> /dev/fs/C/users/dev/lib
//! ```
//!
//! Path separator: `;` for `Windows`, `:` for everything else.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SubsystemError;


/// Shell environment a generated script (or resolved value) targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subsystem {
    /// Native POSIX host, no translation.
    #[default]
    None,
    /// Native Windows (`cmd.exe` / `PowerShell`).
    Windows,
    /// MSYS2 (`/c/...`).
    Msys2,
    /// Legacy MSYS (`/c/...`).
    Msys,
    /// Cygwin (`/cygdrive/c/...`).
    Cygwin,
    /// Windows Subsystem for Linux (`/mnt/c/...`).
    Wsl,
    /// Services for Unix (`/dev/fs/C/...`).
    Sfu,
}

impl Subsystem {
    pub const ALL: [Self; 7] = [
        Self::None,
        Self::Windows,
        Self::Msys2,
        Self::Msys,
        Self::Cygwin,
        Self::Wsl,
        Self::Sfu,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Windows => "windows",
            Self::Msys2 => "msys2",
            Self::Msys => "msys",
            Self::Cygwin => "cygwin",
            Self::Wsl => "wsl",
            Self::Sfu => "sfu",
        }
    }

    /// Separator used to join path lists for this subsystem.
    #[must_use]
    pub const fn path_separator(self) -> &'static str {
        match self {
            Self::Windows => ";",
            _ => ":",
        }
    }

    /// Whether variable names are looked up case-insensitively.
    ///
    /// WSL shells run on a Linux environment block, so names stay
    /// case-sensitive there.
    #[must_use]
    pub const fn folds_name_case(self) -> bool {
        matches!(
            self,
            Self::Windows | Self::Msys | Self::Msys2 | Self::Cygwin | Self::Sfu
        )
    }

    /// Picks the subsystem for a target OS.
    ///
    /// A Windows target without an explicit POSIX layer is `Windows`; any
    /// other OS is `None` regardless of the requested layer.
    #[must_use]
    pub const fn for_target(target_is_windows: bool, layer: Option<Self>) -> Self {
        if !target_is_windows {
            return Self::None;
        }
        match layer {
            Some(Self::None) | None => Self::Windows,
            Some(layer) => layer,
        }
    }

    /// Translates a native absolute path into this subsystem's syntax.
    #[must_use]
    pub fn translate(self, path: &str) -> String {
        subsystem_path(self, path)
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subsystem {
    type Err = SubsystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sub| sub.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SubsystemError::Unknown { id: s.to_string() })
    }
}

/// Translates `path` for the subsystem named `subsystem_id`.
///
/// # Errors
///
/// Returns [`SubsystemError::Unknown`] if `subsystem_id` is not recognised.
pub fn translate_path(subsystem_id: &str, path: &str) -> Result<String, SubsystemError> {
    let subsystem: Subsystem = subsystem_id.parse()?;
    Ok(subsystem_path(subsystem, path))
}

/// Maps a native Windows path to the equivalent path for `subsystem`.
///
/// Paths without a drive letter only get their separators flipped (and are
/// lower-cased except for WSL, which is case-sensitive).
#[must_use]
pub fn subsystem_path(subsystem: Subsystem, path: &str) -> String {
    if matches!(subsystem, Subsystem::None | Subsystem::Windows) {
        return path.to_string();
    }

    let path = path.strip_prefix(r"\\?\").unwrap_or(path);
    let path = path.replace(":/", ":\\");
    let has_drive = starts_with_drive(&path);
    let unix = flip_drives(&path);

    if !has_drive {
        return if subsystem == Subsystem::Wsl {
            unix
        } else {
            unix.to_lowercase()
        };
    }

    match subsystem {
        Subsystem::Msys | Subsystem::Msys2 => unix.to_lowercase(),
        Subsystem::Cygwin => format!("/cygdrive{}", unix.to_lowercase()),
        Subsystem::Wsl => {
            // "/c/Users" -> "/mnt/c/Users": only the drive letter is folded
            let (drive, rest) = unix.split_at(2);
            format!("/mnt{}{rest}", drive.to_lowercase())
        }
        Subsystem::Sfu => {
            let lower = unix.to_lowercase();
            let mut chars = lower.chars().skip(1);
            let drive = chars.next().map(|c| c.to_ascii_uppercase());
            let rest: String = chars.collect();
            format!("/dev/fs/{}{rest}", drive.map(String::from).unwrap_or_default())
        }
        Subsystem::None | Subsystem::Windows => unix,
    }
}

fn starts_with_drive(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'\\'
}

/// Rewrites every `X:\` into `/X/` and flips the remaining backslashes.
fn flip_drives(path: &str) -> String {
    let chars: Vec<char> = path.chars().collect();
    let mut out = String::with_capacity(path.len() + 1);
    let mut i = 0;
    while i < chars.len() {
        if i + 2 < chars.len()
            && chars[i].is_ascii_alphabetic()
            && chars[i + 1] == ':'
            && chars[i + 2] == '\\'
        {
            out.push('/');
            out.push(chars[i]);
            out.push('/');
            i += 3;
            continue;
        }
        out.push(if chars[i] == '\\' { '/' } else { chars[i] });
        i += 1;
    }
    out
}
