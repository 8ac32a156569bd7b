// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Windows batch dialect (`.bat`, run with `call`).
//!
//! Values are emitted inside `set "NAME=..."`. Percent signs are doubled;
//! `^ & | < > ( )` are caret-escaped whenever a literal quote has left the
//! surrounding quoted region.

use super::{ScriptDialect, ScriptFormat, ScriptLocation};
use crate::env::item::{EnvKind, RenderedValue};

/// `cmd.exe` batch scripts (CRLF line endings).
#[derive(Debug, Clone, Copy, Default)]
pub struct Bat;

/// Builds the right-hand side of `set "NAME=..."`, tracking quote state.
struct BatValue {
    out: String,
    quoted: bool,
}

impl BatValue {
    const fn new() -> Self {
        Self {
            out: String::new(),
            quoted: true,
        }
    }

    fn literal(&mut self, text: &str) -> &mut Self {
        for c in text.chars() {
            match c {
                '%' => self.out.push_str("%%"),
                '"' => {
                    self.quoted = !self.quoted;
                    self.out.push(c);
                }
                '^' | '&' | '|' | '<' | '>' | '(' | ')' if !self.quoted => {
                    self.out.push('^');
                    self.out.push(c);
                }
                _ => self.out.push(c),
            }
        }
        self
    }

    fn raw(&mut self, text: &str) -> &mut Self {
        self.out.push_str(text);
        self
    }

    fn finish(&mut self) -> String {
        std::mem::take(&mut self.out)
    }
}

pub(crate) fn escape(value: &str) -> String {
    BatValue::new().literal(value).finish()
}

impl ScriptDialect for Bat {
    fn format(&self) -> ScriptFormat {
        ScriptFormat::Bat
    }

    fn newline(&self) -> &'static str {
        "\r\n"
    }

    fn preamble(&self) -> Vec<String> {
        vec!["@echo off".to_string()]
    }

    fn reference(&self, name: &str) -> String {
        format!("%{name}%")
    }

    fn render_assign(&self, name: &str, value: &RenderedValue) -> String {
        if value.kind != EnvKind::Mutate || !value.prior {
            return format!("set \"{name}={}\"", escape(&value.joined_before()));
        }
        if value.before.is_empty() && value.after.is_empty() {
            return format!("rem {name} unchanged");
        }

        let mut with_prior = BatValue::new();
        if !value.before.is_empty() {
            with_prior
                .literal(&value.joined_before())
                .literal(&value.separator);
        }
        with_prior.raw(&self.reference(name));
        if !value.after.is_empty() {
            with_prior
                .literal(&value.separator)
                .literal(&value.joined_after());
        }

        let without_prior = escape(&value.join(None));
        format!(
            "if defined {name} (set \"{name}={}\") else (set \"{name}={without_prior}\")",
            with_prior.finish()
        )
    }

    fn render_unset(&self, name: &str) -> String {
        format!("set {name}=")
    }

    fn render_capture_block(&self, names: &[&str], deactivate: &ScriptLocation) -> Vec<String> {
        let file = format!("\"%~dp0{}\"", deactivate.file_name);
        vec![
            "setlocal".to_string(),
            format!("echo @echo off > {file}"),
            format!("echo echo Restoring environment >> {file}"),
            format!("for %%v in ({}) do (", names.join(" ")),
            "    set foundenvvar=".to_string(),
            "    for /f \"delims== tokens=1,*\" %%a in ('set') do (".to_string(),
            "        if /I \"%%a\" == \"%%v\" (".to_string(),
            format!("            echo set \"%%a=%%b\">> {file}"),
            "            set foundenvvar=1".to_string(),
            "        )".to_string(),
            "    )".to_string(),
            "    if not defined foundenvvar (".to_string(),
            format!("        echo set %%v=>> {file}"),
            "    )".to_string(),
            ")".to_string(),
            "endlocal".to_string(),
        ]
    }

    fn render_deactivate_stub(&self) -> Vec<String> {
        vec![
            "@echo off".to_string(),
            "echo Restoring environment".to_string(),
        ]
    }
}
