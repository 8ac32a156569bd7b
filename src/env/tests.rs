// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::*;
use crate::error::EnvError;
use crate::subsystem::Subsystem;

fn posix(env: &Environment) -> EnvVars {
    env.vars_with(Subsystem::None, LiveEnv::empty())
}

// =============================================================================
// Item operations
// =============================================================================

#[test]
fn test_item_setters() {
    let mut item = EnvItem::keep();
    assert!(item.is_noop());

    item.define("a", Separator::default());
    assert_eq!(item.kind(), EnvKind::Define);
    assert_eq!(item.tokens(), [EnvToken::Literal("a".into())]);

    item.append(["b", "c"], Separator::Path);
    assert_eq!(
        item.tokens(),
        [
            EnvToken::PriorValue,
            EnvToken::Literal("b".into()),
            EnvToken::Literal("c".into())
        ]
    );
    assert!(item.separator().is_path());

    item.prepend("d", Separator::default());
    assert_eq!(item.tokens().last(), Some(&EnvToken::PriorValue));

    item.unset();
    assert_eq!(item.kind(), EnvKind::Unset);
    assert!(item.tokens().is_empty());

    item.clean();
    assert_eq!(item.kind(), EnvKind::Clean);
    assert!(!item.has_prior());
}

#[test]
fn test_append_empty_list_is_noop() {
    let mut item = EnvItem::keep();
    item.append(EnvValues::new(), Separator::default());
    assert!(item.is_noop());
}

#[test]
fn test_last_call_wins_within_one_layer() {
    let mut env = Environment::new();
    env.append("V", "a").prepend("V", "b");

    assert_eq!(
        env.get("V").unwrap().tokens(),
        [EnvToken::Literal("b".into()), EnvToken::PriorValue]
    );
}

#[test]
fn test_remove_value() {
    let mut env = Environment::new();
    env.append("CFLAGS", ["-O2", "-g", "-Wall"]).remove("CFLAGS", "-g");

    assert_eq!(posix(&env).get("CFLAGS").as_deref(), Some("-O2 -Wall"));
}

#[test]
fn test_copy_is_independent() {
    let mut env = Environment::new();
    env.define("A", "1");
    let mut copy = env.copy();
    copy.define("A", "2");

    assert_eq!(posix(&env).get("A").as_deref(), Some("1"));
    assert_eq!(posix(&copy).get("A").as_deref(), Some("2"));
}

// =============================================================================
// Composition
// =============================================================================

#[test]
fn test_dumps_marks_custom_separators_and_empty_defines() {
    let mut env = Environment::new();
    env.append_with_separator("LIBS", ["m", "z"], ",")
        .prepend_with_separator("OPTS", "-x", ", ")
        .define("NONE", Vec::<String>::new())
        .define_path("DIRS", Vec::<String>::new());

    insta::assert_snapshot!(env.dumps(), @r"
    LIBS+=(sep=,)m
    LIBS+=(sep=,)z
    OPTS=+(sep=, )-x
    NONE=
    DIRS=(path)
    ");
}

#[test]
fn test_invalid_names_are_reported() {
    let mut env = Environment::new();
    env.define("GOOD_1", "a").define("_x", "b");
    assert_eq!(env.validate_names(), Ok(()));

    env.define("BAD NAME", "c").define("9LIVES", "d");
    assert_eq!(
        env.validate_names(),
        Err(EnvError::InvalidName {
            name: "BAD NAME".to_string()
        })
    );
    assert!(!is_valid_name(""));
    assert!(!is_valid_name("A-B"));
    assert!(!is_valid_name("Ä"));
}

#[test]
fn test_copy_renders_identically() {
    let mut env = Environment::new();
    env.define("A", "1").append_path("PATH", "/x").unset("B");

    for subsystem in Subsystem::ALL {
        let live = LiveEnv::empty().with("PATH", "/old");
        let original: Vec<_> = env
            .vars_with(subsystem, live.clone())
            .items()
            .map(|(n, v)| (n.to_string(), v))
            .collect();
        let copied: Vec<_> = env
            .copy()
            .vars_with(subsystem, live)
            .items()
            .map(|(n, v)| (n.to_string(), v))
            .collect();
        assert_eq!(original, copied);
    }
}

#[test]
fn test_last_define_wins() {
    let mut base = Environment::new();
    base.define("V", "a");
    let mut overlay = Environment::new();
    overlay.define("V", "b");

    let composed = base.compose(&overlay).unwrap();
    assert_eq!(posix(&composed).get("V").as_deref(), Some("b"));
}

#[test]
fn test_unset_beats_mutate() {
    let mut base = Environment::new();
    base.append("V", "a");
    let mut overlay = Environment::new();
    overlay.unset("V");

    let vars = base
        .compose(&overlay)
        .unwrap()
        .vars_with(Subsystem::None, LiveEnv::empty().with("V", "ambient"));
    assert_eq!(vars.get("V"), None);
    assert_eq!(
        vars.lookup("V"),
        Err(EnvError::Unset {
            name: "V".to_string()
        })
    );
}

#[test]
fn test_compose_splices_base_into_placeholder() {
    let mut base = Environment::new();
    base.append("CFLAGS", "-O2");
    let mut overlay = Environment::new();
    overlay.append("CFLAGS", "-g");

    let composed = base.compose(&overlay).unwrap();
    let item = composed.get("CFLAGS").unwrap();
    assert_eq!(item.kind(), EnvKind::Mutate);
    assert_eq!(
        item.tokens(),
        [
            EnvToken::PriorValue,
            EnvToken::Literal("-O2".into()),
            EnvToken::Literal("-g".into())
        ]
    );
}

#[test]
fn test_compose_mutate_over_define_resolves_placeholder() {
    let mut base = Environment::new();
    base.define("CC", "gcc");
    let mut overlay = Environment::new();
    overlay.append("CC", "-m32");

    let composed = base.compose(&overlay).unwrap();
    let item = composed.get("CC").unwrap();
    assert_eq!(item.kind(), EnvKind::Define);
    assert!(!item.has_prior());
    assert_eq!(posix(&composed).get("CC").as_deref(), Some("gcc -m32"));
}

#[test]
fn test_compose_mutate_over_unset_becomes_define() {
    let mut base = Environment::new();
    base.unset("V");
    let mut overlay = Environment::new();
    overlay.prepend("V", "x");

    let composed = base.compose(&overlay).unwrap();
    assert_eq!(composed.get("V").unwrap().kind(), EnvKind::Define);
    let vars = composed.vars_with(Subsystem::None, LiveEnv::empty().with("V", "ambient"));
    assert_eq!(vars.get("V").as_deref(), Some("x"));
}

#[test]
fn test_compose_does_not_mutate_inputs() {
    let mut base = Environment::new();
    base.append("V", "a");
    let mut overlay = Environment::new();
    overlay.append("V", "b").define("W", "1");
    let (base_before, overlay_before) = (base.clone(), overlay.clone());

    let _ = base.compose(&overlay).unwrap();
    assert_eq!(base, base_before);
    assert_eq!(overlay, overlay_before);
}

#[test]
fn test_compose_keeps_base_order_then_overlay() {
    let mut base = Environment::new();
    base.define("B", "1").define("A", "1");
    let mut overlay = Environment::new();
    overlay.define("C", "1").define("A", "2");

    let composed = base.compose(&overlay).unwrap();
    assert_eq!(composed.names().collect::<Vec<_>>(), ["B", "A", "C"]);
}

#[test]
fn test_compose_separator_conflict() {
    let mut base = Environment::new();
    base.append_with_separator("V", "a", ",");
    let mut overlay = Environment::new();
    overlay.append("V", "b");

    let err = base.compose(&overlay).unwrap_err();
    assert_eq!(
        err,
        EnvError::SeparatorConflict {
            name: "V".to_string(),
            base: ",".to_string(),
            overlay: " ".to_string(),
        }
    );
}

#[test]
fn test_compose_left_fold() {
    let layers: Vec<Environment> = ["a", "b", "c"]
        .into_iter()
        .map(|v| {
            let mut env = Environment::new();
            env.append_path("PATH", v);
            env
        })
        .collect();

    let folded = layers
        .iter()
        .try_fold(Environment::new(), |acc, layer| acc.compose(layer))
        .unwrap();
    assert_eq!(posix(&folded).get("PATH").as_deref(), Some("a:b:c"));
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_append_without_ambient_value() {
    let mut env = Environment::new();
    env.append_path("PATH", "/x");

    assert_eq!(posix(&env).get("PATH").as_deref(), Some("/x"));
}

#[test]
fn test_append_with_ambient_value() {
    let mut env = Environment::new();
    env.append_path("PATH", "/x");

    let vars = env.vars_with(Subsystem::None, LiveEnv::empty().with("PATH", "/old"));
    assert_eq!(vars.get("PATH").as_deref(), Some("/old:/x"));
}

#[test]
fn test_prepend_with_ambient_value() {
    let mut env = Environment::new();
    env.prepend_path("PATH", "/x");

    let vars = env.vars_with(Subsystem::None, LiveEnv::empty().with("PATH", "/old"));
    assert_eq!(vars.get("PATH").as_deref(), Some("/x:/old"));
}

#[test]
fn test_empty_ambient_value_leaves_no_separator() {
    let mut env = Environment::new();
    env.append_path("PATH", "/x");

    let vars = env.vars_with(Subsystem::None, LiveEnv::empty().with("PATH", ""));
    assert_eq!(vars.get("PATH").as_deref(), Some("/x"));
}

#[test]
fn test_path_separator_per_target() {
    let mut env = Environment::new();
    env.append_path("LIB", ["a", "b"]);

    let posix = env.vars_with(Subsystem::None, LiveEnv::empty());
    let windows = env.vars_with(Subsystem::Windows, LiveEnv::empty());
    assert_eq!(posix.get("LIB").as_deref(), Some("a:b"));
    assert_eq!(windows.get("LIB").as_deref(), Some("a;b"));
}

#[test]
fn test_path_tokens_translated_once() {
    let mut env = Environment::new();
    env.prepend_path("PATH", r"C:\Tools\Bin");

    let vars = env.vars_with(Subsystem::Cygwin, LiveEnv::empty().with("PATH", "/usr/bin"));
    assert_eq!(vars.get("PATH").as_deref(), Some("/cygdrive/c/tools/bin:/usr/bin"));
}

#[test]
fn test_windows_live_lookup_is_case_insensitive() {
    let mut env = Environment::new();
    env.append_path("Path", r"C:\x");

    let live = LiveEnv::empty().with("PATH", r"C:\Windows");
    let windows = env.vars_with(Subsystem::Windows, live.clone());
    assert_eq!(windows.get("Path").as_deref(), Some(r"C:\Windows;C:\x"));

    let posix = env.vars_with(Subsystem::None, live);
    assert_eq!(posix.get("Path").as_deref(), Some(r"C:\x"));
}

#[test]
fn test_wsl_live_lookup_is_case_sensitive() {
    let mut env = Environment::new();
    env.append_path("PATH", "/opt/bin");

    let live = LiveEnv::empty().with("path", "/lower");
    let wsl = env.vars_with(Subsystem::Wsl, live.clone());
    assert_eq!(wsl.get("PATH").as_deref(), Some("/opt/bin"));

    let msys2 = env.vars_with(Subsystem::Msys2, live);
    assert_eq!(msys2.get("PATH").as_deref(), Some("/lower:/opt/bin"));
}

#[cfg(unix)]
#[test]
fn test_live_env_skips_non_utf8_variables() {
    use std::ffi::{OsStr, OsString};
    use std::os::unix::ffi::OsStrExt;

    let live = LiveEnv::from_os_vars([
        (OsString::from("GOOD"), OsString::from("1")),
        (OsString::from("BAD_VALUE"), OsStr::from_bytes(b"\xff\xfe").to_os_string()),
        (OsStr::from_bytes(b"BAD_\xffNAME").to_os_string(), OsString::from("2")),
    ]);

    assert_eq!(live.get("GOOD", false), Some("1"));
    assert_eq!(live, LiveEnv::empty().with("GOOD", "1"));
}

#[test]
fn test_live_env_capture_does_not_panic() {
    let live = LiveEnv::capture();
    if let Ok(path) = std::env::var("PATH") {
        assert_eq!(live.get("PATH", false), Some(path.as_str()));
    }
}

#[test]
fn test_clean_is_empty_not_missing() {
    let mut env = Environment::new();
    env.clean("V");

    let vars = posix(&env);
    assert_eq!(vars.get("V").as_deref(), Some(""));
    assert_eq!(vars.lookup("V").as_deref(), Ok(""));
}

#[test]
fn test_lookup_absent() {
    let vars = posix(&Environment::new());
    assert_eq!(
        vars.lookup("MISSING"),
        Err(EnvError::NotDefined {
            name: "MISSING".to_string()
        })
    );
    assert_eq!(vars.get_or("MISSING", "fallback"), "fallback");
}

#[test]
fn test_items_skip_unset() {
    let mut env = Environment::new();
    env.define("A", "1").unset("B").define_with_separator("C", ["x", "y"], ",");

    let items: Vec<_> = posix(&env)
        .items()
        .map(|(n, v)| format!("{n}={v}"))
        .collect();
    assert_eq!(items, ["A=1", "C=x,y"]);
    assert_eq!(posix(&env).unset_names().collect::<Vec<_>>(), ["B"]);
}

#[test]
fn test_apply_to_command() {
    let mut env = Environment::new();
    env.define("A", "1").unset("B");

    let mut command = std::process::Command::new("true");
    posix(&env).apply_to(&mut command);

    let envs: Vec<_> = command
        .get_envs()
        .map(|(k, v)| {
            let value = v.map(|v| v.to_string_lossy().into_owned());
            (k.to_string_lossy().into_owned(), value)
        })
        .collect();
    assert_eq!(
        envs,
        [
            ("A".to_string(), Some("1".to_string())),
            ("B".to_string(), None)
        ]
    );
}

#[test]
fn test_dumps() {
    let mut env = Environment::new();
    env.define("CC", "gcc")
        .append("CFLAGS", ["-O2", "-g"])
        .prepend_path("PATH", ["/a", "/b"])
        .unset("OLD")
        .clean("EMPTY");

    insta::assert_snapshot!(env.dumps(), @r"
    CC=gcc
    CFLAGS+=-O2
    CFLAGS+=-g
    PATH=+(path)/b
    PATH=+(path)/a
    OLD=!
    EMPTY=
    ");
}
