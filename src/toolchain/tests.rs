// toolenv: Toolchain Environment Script Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::ToolchainFlags;
use crate::env::{Environment, LiveEnv};
use crate::subsystem::Subsystem;

#[test]
fn test_empty_flags_produce_empty_environment() {
    let flags = ToolchainFlags::default();
    assert!(flags.is_empty());
    assert!(flags.environment().is_empty());
}

#[test]
fn test_environment_dump() {
    let flags = ToolchainFlags::builder()
        .cc("gcc")
        .cxx("g++")
        .defines(vec!["NDEBUG".to_string(), "MODE=2".to_string()])
        .cflags(vec!["-O2".to_string()])
        .cxxflags(vec!["-O2".to_string(), "-std=c++20".to_string()])
        .ldflags(vec!["-s".to_string()])
        .pkg_config_dirs(vec!["/opt/lib/pkgconfig".into()])
        .build();

    insta::assert_snapshot!(flags.environment().dumps(), @r"
    CC=gcc
    CXX=g++
    CPPFLAGS+=-DNDEBUG
    CPPFLAGS+=-DMODE=2
    CXXFLAGS+=-O2
    CXXFLAGS+=-std=c++20
    CFLAGS+=-O2
    LDFLAGS+=-s
    PKG_CONFIG_PATH=+(path)/opt/lib/pkgconfig
    ");
}

#[test]
fn test_flags_extend_ambient_values() {
    let flags = ToolchainFlags::builder()
        .cflags(vec!["-fPIC".to_string()])
        .build();

    let vars = flags
        .environment()
        .vars_with(Subsystem::None, LiveEnv::empty().with("CFLAGS", "-g"));
    assert_eq!(vars.get("CFLAGS").as_deref(), Some("-g -fPIC"));
}

#[test]
fn test_profile_layer_overrides_compiler() {
    let flags = ToolchainFlags::builder().cc("gcc").build();
    let mut profile = Environment::new();
    profile.define("CC", "clang");

    let composed = flags.environment().compose(&profile).unwrap();
    let vars = composed.vars_with(Subsystem::None, LiveEnv::empty());
    assert_eq!(vars.get("CC").as_deref(), Some("clang"));
}
