// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! POSIX shell dialect (`.sh`, sourced with `.`).

use super::{ScriptDialect, ScriptFormat, ScriptLocation};
use crate::env::item::{EnvKind, RenderedValue};

/// POSIX `sh` scripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sh;

/// Escapes text for use inside a double-quoted shell word.
pub(crate) fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl ScriptDialect for Sh {
    fn format(&self) -> ScriptFormat {
        ScriptFormat::Sh
    }

    fn reference(&self, name: &str) -> String {
        format!("${name}")
    }

    fn render_assign(&self, name: &str, value: &RenderedValue) -> String {
        if value.kind != EnvKind::Mutate || !value.prior {
            return format!("export {name}=\"{}\"", escape(&value.joined_before()));
        }

        let sep = escape(&value.separator);
        let before = escape(&value.joined_before());
        let after = escape(&value.joined_after());
        let reference = self.reference(name);
        match (value.before.is_empty(), value.after.is_empty()) {
            (false, false) => {
                format!("export {name}=\"{before}${{{name}:+{sep}{reference}}}{sep}{after}\"")
            }
            (false, true) => format!("export {name}=\"{before}${{{name}:+{sep}{reference}}}\""),
            (true, false) => format!("export {name}=\"${{{name}:+{reference}{sep}}}{after}\""),
            (true, true) => format!("# {name} unchanged"),
        }
    }

    fn render_unset(&self, name: &str) -> String {
        format!("unset {name}")
    }

    fn render_capture_block(&self, names: &[&str], deactivate: &ScriptLocation) -> Vec<String> {
        let file = escape(&deactivate.target_path);
        vec![
            format!("echo \"echo Restoring environment\" > \"{file}\""),
            format!("for _toolenv_var in {}", names.join(" ")),
            "do".to_string(),
            "    _toolenv_defined=\"true\"".to_string(),
            "    _toolenv_value=$(printenv \"$_toolenv_var\") || _toolenv_defined=\"\"".to_string(),
            "    if [ -n \"$_toolenv_value\" ] || [ -n \"$_toolenv_defined\" ]".to_string(),
            "    then".to_string(),
            "        _toolenv_value=$(printf '%s' \"$_toolenv_value\" | sed \"s/'/'\\\\\\\\''/g\")"
                .to_string(),
            format!(
                "        printf \"export %s='%s'\\n\" \"$_toolenv_var\" \"$_toolenv_value\" >> \"{file}\""
            ),
            "    else".to_string(),
            format!("        printf \"unset %s\\n\" \"$_toolenv_var\" >> \"{file}\""),
            "    fi".to_string(),
            "done".to_string(),
            "unset _toolenv_var _toolenv_defined _toolenv_value".to_string(),
        ]
    }

    fn render_deactivate_stub(&self) -> Vec<String> {
        vec!["echo Restoring environment".to_string()]
    }
}
