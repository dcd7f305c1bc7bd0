#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{Context, Result};

/// Stand-in for `dnf`: answers `makecache`, structured `repoquery` and `repoquery --info`.
const STUB_DNF: &str = r#"#!/bin/sh
for last; do :; done

if [ "$2" = "makecache" ]; then
    if [ -n "$STUB_DNF_FAIL_INIT" ]; then
        echo "Cannot download repomd.xml" >&2
        exit 1
    fi
    exit 0
fi

case "$*" in
*--info*)
    case "$last" in
    pkgA) printf 'Name         : pkgA\nSource       : pkgA-1.0-1.fc40.src.rpm\nLicense      : MIT\n\nName         : pkgA\nSource       : pkgA-1.0-3.fc40.src.rpm\nLicense      : MIT AND BSD\n' ;;
    pkgC) printf 'Source: pkgC-2.0-2.fc40.src.rpm\nLicense: GPL-2.0\n' ;;
    *) echo "No matching packages" >&2; exit 1 ;;
    esac
    ;;
*--latest-limit*)
    case "$last" in
    pkgA) printf 'pkgA\t0\t1.0\t3.fc40\t1.0-3.fc40\tMIT AND BSD\n' ;;
    *) exit 1 ;;
    esac
    ;;
*)
    case "$last" in
    pkgA) printf 'pkgA\t0\t1.0\t1.fc40\t1.0-1.fc40\tMIT\npkgA\t0\t1.0\t3.fc40\t1.0-3.fc40\tMIT AND BSD\n' ;;
    pkgC) printf 'pkgC\t0\t2.0\t2.fc40\t2.0-2.fc40\tGPL-2.0\n' ;;
    *) echo "No match for argument: $last" >&2; exit 1 ;;
    esac
    ;;
esac
"#;

const INPUT: &str = "UBI?,package,License\n\
                     no,pkgA.x86_64,\n\
                     yes,pkgB,\n\
                     NO,pkgC,old\n\
                     no,ghost,\n";

const EXPECTED: &str = "UBI?,package,License\n\
                        no,pkgA.x86_64,MIT AND BSD\n\
                        yes,pkgB,\n\
                        NO,pkgC,GPL-2.0\n\
                        no,ghost,Error: Command Failed\n";

/// A workspace with the stub dnf and a project config pointing at it.
fn workspace(backend: &str) -> Result<tempfile::TempDir> {
    let ws = tempfile::tempdir().context("create ws")?;
    let stub = ws.path().join("stub-dnf");
    fs::write(&stub, STUB_DNF)?;
    fs::set_permissions(&stub, fs::Permissions::from_mode(0o755))?;

    let cfg_dir = ws.path().join(".rpm-license-updater");
    fs::create_dir(&cfg_dir)?;
    fs::write(
        cfg_dir.join("config.toml"),
        format!("backend = \"{}\"\ndnf_command = {:?}\n", backend, stub.display().to_string()),
    )?;
    fs::write(ws.path().join("input.csv"), INPUT)?;
    Ok(ws)
}

fn run_updater(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
    let out = Command::new(env!("CARGO_BIN_EXE_rpm-license-updater"))
        .current_dir(cwd)
        .args(args)
        .envs(envs.iter().copied())
        .output()
        .with_context(|| format!("run rpm-license-updater {:?} in {}", args, cwd.display()))?;
    Ok(out)
}

fn output_path(ws: &tempfile::TempDir) -> PathBuf {
    ws.path().join("out.csv")
}

#[test]
fn repoquery_backend_updates_eligible_rows() -> Result<()> {
    let ws = workspace("repoquery")?;
    let out = run_updater(ws.path(), &["input.csv", "-o", "out.csv"], &[])?;

    assert!(out.status.success());
    assert_eq!(fs::read_to_string(output_path(&ws))?, EXPECTED);
    Ok(())
}

#[test]
fn info_backend_updates_eligible_rows() -> Result<()> {
    let ws = workspace("info")?;
    let out = run_updater(ws.path(), &["input.csv", "--output", "out.csv"], &[])?;

    assert!(out.status.success());
    assert_eq!(fs::read_to_string(output_path(&ws))?, EXPECTED);
    Ok(())
}

#[test]
fn backend_flag_overrides_config() -> Result<()> {
    let ws = workspace("repoquery")?;
    let out = run_updater(
        ws.path(),
        &["input.csv", "-o", "out.csv", "--backend", "info"],
        &[("STUB_DNF_FAIL_INIT", "1")],
    )?;

    // The info backend never runs makecache, so the failing init does not matter.
    assert!(out.status.success());
    assert_eq!(fs::read_to_string(output_path(&ws))?, EXPECTED);
    Ok(())
}

#[test]
fn rerun_on_updated_table_is_stable() -> Result<()> {
    let ws = workspace("repoquery")?;
    run_updater(ws.path(), &["input.csv", "-o", "out.csv"], &[])?;
    let out = run_updater(ws.path(), &["out.csv", "-o", "out.csv"], &[])?;

    assert!(out.status.success());
    assert_eq!(fs::read_to_string(output_path(&ws))?, EXPECTED);
    Ok(())
}

#[test]
fn preview_is_printed_without_output_path() -> Result<()> {
    let ws = workspace("info")?;
    let out = run_updater(ws.path(), &["input.csv"], &[])?;
    let stdout = String::from_utf8_lossy(&out.stdout);

    assert!(out.status.success());
    assert!(stdout.contains("Updated table (first 20 rows)"));
    assert!(stdout.contains("Updated table (last 20 rows)"));
    assert!(stdout.contains("GPL-2.0"));
    assert!(!output_path(&ws).exists());
    Ok(())
}

#[test]
fn json_report_lists_rows() -> Result<()> {
    let ws = workspace("info")?;
    let out = run_updater(ws.path(), &["input.csv", "--report", "json", "--quiet"], &[])?;
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&out.stdout)?;

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["License"], "MIT AND BSD");
    assert_eq!(rows[1]["License"], "");
    Ok(())
}

#[test]
fn missing_input_is_reported_with_exit_zero() -> Result<()> {
    let ws = workspace("repoquery")?;
    let out = run_updater(ws.path(), &["nope.csv", "-o", "out.csv"], &[])?;

    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("was not found"));
    assert!(!output_path(&ws).exists());
    Ok(())
}

#[test]
fn missing_column_aborts_the_run() -> Result<()> {
    let ws = workspace("repoquery")?;
    fs::write(ws.path().join("bad.csv"), "UBI?,name,License\nno,pkgA,\n")?;
    let out = run_updater(ws.path(), &["bad.csv", "-o", "out.csv"], &[])?;

    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing required column 'package'"));
    assert!(!output_path(&ws).exists());
    Ok(())
}

#[test]
fn repository_init_failure_writes_nothing() -> Result<()> {
    let ws = workspace("repoquery")?;
    let out = run_updater(
        ws.path(),
        &["input.csv", "-o", "out.csv"],
        &[("STUB_DNF_FAIL_INIT", "1")],
    )?;

    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Error initializing dnf"));
    assert!(!output_path(&ws).exists());
    Ok(())
}

#[test]
fn lookup_prints_a_single_license() -> Result<()> {
    let ws = workspace("repoquery")?;
    let out = run_updater(ws.path(), &["--lookup", "pkgA.noarch"], &[])?;
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "MIT AND BSD");

    let out = run_updater(ws.path(), &["--lookup", "ghost"], &[])?;
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "Error: Command Failed");
    Ok(())
}
