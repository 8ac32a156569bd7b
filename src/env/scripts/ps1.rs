// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `PowerShell` dialect (`.ps1`, UTF-8 with BOM so Windows `PowerShell` 5 reads it as UTF-8).

use super::{ScriptDialect, ScriptFormat, ScriptLocation};
use crate::env::item::{EnvKind, RenderedValue};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// `PowerShell` scripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ps1;

/// Escapes text for a double-quoted `PowerShell` string.
pub(crate) fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '`' | '"' | '$' | '\u{201C}' | '\u{201D}' | '\u{201E}') {
            out.push('`');
        }
        out.push(c);
    }
    out
}

impl ScriptDialect for Ps1 {
    fn format(&self) -> ScriptFormat {
        ScriptFormat::Ps1
    }

    fn bom(&self) -> &'static [u8] {
        UTF8_BOM
    }

    fn reference(&self, name: &str) -> String {
        format!("${{env:{name}}}")
    }

    fn render_assign(&self, name: &str, value: &RenderedValue) -> String {
        let target = self.reference(name);
        if value.kind != EnvKind::Mutate || !value.prior {
            return format!("{target} = \"{}\"", escape(&value.joined_before()));
        }
        if value.before.is_empty() && value.after.is_empty() {
            return format!("# {name} unchanged");
        }

        let sep = escape(&value.separator);
        let mut with_prior = String::new();
        if !value.before.is_empty() {
            with_prior.push_str(&escape(&value.joined_before()));
            with_prior.push_str(&sep);
        }
        with_prior.push_str(&target);
        if !value.after.is_empty() {
            with_prior.push_str(&sep);
            with_prior.push_str(&escape(&value.joined_after()));
        }

        let without_prior = escape(&value.join(None));
        format!(
            "{target} = if ({target}) {{ \"{with_prior}\" }} else {{ \"{without_prior}\" }}"
        )
    }

    fn render_unset(&self, name: &str) -> String {
        let path = format!("'Env:{name}'");
        format!("if (Test-Path -LiteralPath {path}) {{ Remove-Item -LiteralPath {path} }}")
    }

    fn render_capture_block(&self, names: &[&str], deactivate: &ScriptLocation) -> Vec<String> {
        let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
        vec![
            format!(
                "$toolenv_deactivate = Join-Path $PSScriptRoot '{}'",
                deactivate.file_name.replace('\'', "''")
            ),
            "Set-Content -LiteralPath $toolenv_deactivate -Value 'Write-Output \"Restoring environment\"' -Encoding utf8"
                .to_string(),
            format!("foreach ($toolenv_var in @({})) {{", quoted.join(", ")),
            "    $toolenv_value = [Environment]::GetEnvironmentVariable($toolenv_var)".to_string(),
            "    if ($null -ne $toolenv_value) {".to_string(),
            "        $toolenv_value = $toolenv_value -replace \"'\", \"''\"".to_string(),
            "        Add-Content -LiteralPath $toolenv_deactivate -Value \"`${env:$toolenv_var} = '$toolenv_value'\" -Encoding utf8"
                .to_string(),
            "    } else {".to_string(),
            "        Add-Content -LiteralPath $toolenv_deactivate -Value \"if (Test-Path -LiteralPath 'Env:$toolenv_var') { Remove-Item -LiteralPath 'Env:$toolenv_var' }\" -Encoding utf8"
                .to_string(),
            "    }".to_string(),
            "}".to_string(),
        ]
    }

    fn render_deactivate_stub(&self) -> Vec<String> {
        vec!["Write-Output \"Restoring environment\"".to_string()]
    }
}
