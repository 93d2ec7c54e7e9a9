//! Process tool tests for pmem-testbed-tools.
// crates/pmem-testbed-tools/tests/process_tools.rs
// =============================================================================
// Module: Process Tool Tests
// Description: Validate probe invocation and executor behavior end to end.
// Purpose: Exercise real subprocess spawning against scripted tools.
// =============================================================================

#![cfg(unix)]
#![allow(
    clippy::use_debug,
    reason = "Test-only diagnostics render captured reports with Debug."
)]

use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::path::PathBuf;

use pmem_testbed_core::ExecRequest;
use pmem_testbed_core::Granularity;
use pmem_testbed_core::GranularityProbe;
use pmem_testbed_core::TestExecutor;
use pmem_testbed_tools::GranDetecto;
use pmem_testbed_tools::ProcessExecutor;
use tempfile::TempDir;

type TestResult = Result<(), String>;

/// Writes an executable script and returns its path.
fn write_script(dir: &Path, name: &str, body: &str) -> Result<PathBuf, String> {
    let path = dir.join(name);
    fs::write(&path, body).map_err(|err| err.to_string())?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).map_err(|err| err.to_string())?;
    Ok(path)
}

/// Scripted probe that accepts byte assertions and reports page on detect.
fn byte_only_probe(dir: &Path) -> Result<GranDetecto, String> {
    let script = write_script(
        dir,
        "gran_detecto",
        "#!/bin/sh\ncase \"$1\" in\n  -b) echo byte ok; exit 0 ;;\n  -d) echo detected: page; exit 0 ;;\n  *) echo mismatch for \"$2\"; exit 1 ;;\nesac\n",
    )?;
    Ok(GranDetecto::new(script))
}

#[test]
fn probe_pass_and_fail_follow_exit_status() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let probe = byte_only_probe(dir.path())?;

    let report = probe.check(dir.path(), Granularity::Byte).map_err(|err| err.to_string())?;
    if !report.passed || !report.output.contains("byte ok") {
        return Err(format!("unexpected passing report: {report:?}"));
    }

    let report = probe.check(dir.path(), Granularity::Page).map_err(|err| err.to_string())?;
    if report.passed || !report.output.contains("mismatch") {
        return Err(format!("unexpected failing report: {report:?}"));
    }
    Ok(())
}

#[test]
fn probe_detect_reports_diagnostic_output() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let probe = byte_only_probe(dir.path())?;
    let report = probe.detect(dir.path()).map_err(|err| err.to_string())?;
    if !report.passed || !report.output.contains("detected: page") {
        return Err(format!("unexpected detect report: {report:?}"));
    }
    Ok(())
}

#[test]
fn probe_spawn_failure_is_an_invocation_error() -> TestResult {
    let probe = GranDetecto::new("/nonexistent/gran_detecto");
    match probe.detect(Path::new("/tmp")) {
        Err(error) if error.to_string().contains("probe invocation failed") => Ok(()),
        Err(error) => Err(format!("unexpected error: {error}")),
        Ok(report) => Err(format!("expected spawn failure, got {report:?}")),
    }
}

#[test]
fn executor_applies_environment_overlay_and_cwd() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let script = write_script(
        dir.path(),
        "check_env",
        "#!/bin/sh\ntest \"$PMEM2_FORCE_GRANULARITY\" = BYTE || exit 3\npwd\n",
    )?;
    let env = BTreeMap::from([("PMEM2_FORCE_GRANULARITY".to_string(), "BYTE".to_string())]);
    let args: Vec<String> = Vec::new();
    let outcome = ProcessExecutor::new()
        .exec(&ExecRequest {
            program: &script,
            args: &args,
            env: &env,
            cwd: Some(dir.path()),
        })
        .map_err(|err| err.to_string())?;
    if !outcome.success() {
        return Err(format!("overlay not applied: {outcome:?}"));
    }
    let canonical = dir.path().canonicalize().map_err(|err| err.to_string())?;
    if !outcome.stdout.trim().ends_with(&canonical.display().to_string()) {
        return Err(format!("unexpected working directory: {}", outcome.stdout));
    }
    Ok(())
}

#[test]
fn executor_reports_nonzero_exit_as_outcome() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let script = write_script(dir.path(), "fail", "#!/bin/sh\nexit 7\n")?;
    let env = BTreeMap::new();
    let args: Vec<String> = Vec::new();
    let outcome = ProcessExecutor::new()
        .exec(&ExecRequest {
            program: &script,
            args: &args,
            env: &env,
            cwd: None,
        })
        .map_err(|err| err.to_string())?;
    if outcome.exit_code != Some(7) {
        return Err(format!("unexpected exit code: {:?}", outcome.exit_code));
    }
    Ok(())
}

#[test]
fn executor_spawn_failure_is_an_error() -> TestResult {
    let env = BTreeMap::new();
    let args: Vec<String> = Vec::new();
    match ProcessExecutor::new().exec(&ExecRequest {
        program: Path::new("/nonexistent/test_binary"),
        args: &args,
        env: &env,
        cwd: None,
    }) {
        Err(error) if error.to_string().contains("spawn failed") => Ok(()),
        Err(error) => Err(format!("unexpected error: {error}")),
        Ok(outcome) => Err(format!("expected spawn failure, got {outcome:?}")),
    }
}
