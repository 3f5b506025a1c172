// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Runs the built binary against fake `elf2uf2` and `picotool` scripts and
//! checks exit codes and stdout.
//!
//! Kept to a single test so no other thread forks while the scripts are
//! being written (avoids ETXTBSY when executing them).

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output};

fn write_tool(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn rp2040_load(tools: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rp2040-load"))
        .arg("--tools-dir")
        .arg(tools)
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_binary_exit_codes_and_stdout() {
    let tools = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let elf = work.path().join("fw.elf");
    fs::write(&elf, b"\x7fELF").unwrap();
    let elf = elf.to_str().unwrap();

    // --- all stages succeed ---

    write_tool(tools.path(), "elf2uf2", r#"cp "$1" "$2""#);
    write_tool(
        tools.path(),
        "picotool",
        r#"[ "$1" = load ] && echo "Loading into Flash: 100%"
exit 0"#,
    );

    let output = rp2040_load(tools.path(), &["-D", elf]);
    assert_eq!(output.status.code(), Some(0));
    // one launch marker from the single device lookup, then the final line break
    assert_eq!(String::from_utf8_lossy(&output.stdout), ".\n");
    assert!(output.stderr.is_empty());

    // --- converter fails, quiet ---

    write_tool(
        tools.path(),
        "elf2uf2",
        r#"echo "ERROR: not an ELF file" >&2; exit 1"#,
    );

    let output = rp2040_load(tools.path(), &["-D", elf]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    // --- converter fails, verbose: captured output is reported ---

    let output = rp2040_load(tools.path(), &["-v", "-D", elf]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Converting elf to uf2 ...ERROR: not an ELF file\n"));
    assert!(!stdout.contains(" OK"));
}
