// crates/pmem-testbed-core/src/runtime/runner/tests.rs
// ============================================================================
// Module: Test Case Runner Tests
// Description: Unit tests for the setup/exec/teardown run contract.
// Purpose: Validate overlay hand-off and unconditional teardown.
// Dependencies: pmem-testbed-core, tempfile
// ============================================================================

//! ## Overview
//! Validates that the runner hands the context's environment overlay and
//! test directory to the executor, tears down after execution regardless of
//! outcome, and never runs the executable when setup fails.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use tempfile::TempDir;

use super::RunError;
use super::run_test_case;
use crate::core::context::FsContext;
use crate::core::context::GranularityContext;
use crate::core::context::NoFsContext;
use crate::core::granularity::FORCE_GRANULARITY_ENV;
use crate::core::granularity::Granularity;
use crate::core::requirement::ContextOptions;
use crate::core::testbed::TestBedConfig;
use crate::interfaces::ExecError;
use crate::interfaces::ExecOutcome;
use crate::interfaces::ExecRequest;
use crate::interfaces::GranularityProbe;
use crate::interfaces::ProbeError;
use crate::interfaces::ProbeReport;
use crate::interfaces::TestExecutor;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Fake probe with a fixed verdict.
struct FakeProbe {
    /// Whether assertions pass.
    passes: bool,
}

impl GranularityProbe for FakeProbe {
    fn check(&self, _dir: &Path, _granularity: Granularity) -> Result<ProbeReport, ProbeError> {
        Ok(ProbeReport {
            passed: self.passes,
            output: String::new(),
        })
    }

    fn detect(&self, _dir: &Path) -> Result<ProbeReport, ProbeError> {
        Ok(ProbeReport {
            passed: true,
            output: String::new(),
        })
    }
}

/// Recorded request snapshot captured by the fake executor.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RecordedRequest {
    /// Program path handed to the executor.
    program: PathBuf,
    /// Environment overlay handed to the executor.
    env: BTreeMap<String, String>,
    /// Working directory handed to the executor.
    cwd: Option<PathBuf>,
}

/// Fake executor recording the request and returning a fixed exit code.
struct FakeExecutor {
    /// Exit code to report.
    exit_code: i32,
    /// Captured request, if the executor ran.
    recorded: RefCell<Option<RecordedRequest>>,
}

impl FakeExecutor {
    /// Creates an executor reporting the given exit code.
    fn reporting(exit_code: i32) -> Self {
        Self {
            exit_code,
            recorded: RefCell::new(None),
        }
    }
}

impl TestExecutor for FakeExecutor {
    fn exec(&self, request: &ExecRequest<'_>) -> Result<ExecOutcome, ExecError> {
        *self.recorded.borrow_mut() = Some(RecordedRequest {
            program: request.program.to_path_buf(),
            env: request.env.clone(),
            cwd: request.cwd.map(Path::to_path_buf),
        });
        Ok(ExecOutcome {
            exit_code: Some(self.exit_code),
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

/// Builds a forced byte context under the given base directory.
fn byte_context(base: &Path) -> GranularityContext {
    let config = TestBedConfig {
        byte_fs_dir: Some(base.to_path_buf()),
        force_byte: true,
        ..TestBedConfig::default()
    };
    let ctx = FsContext::new(&config, Granularity::Byte, "tc_run", &ContextOptions::default())
        .expect("context constructs");
    GranularityContext::Fs(ctx)
}

// ============================================================================
// SECTION: Run Contract Tests
// ============================================================================

#[test]
fn runner_hands_overlay_and_testdir_to_executor() {
    let base = TempDir::new().expect("tempdir");
    let ctx = byte_context(base.path());
    let executor = FakeExecutor::reporting(0);
    let outcome = run_test_case(
        &ctx,
        &FakeProbe {
            passes: true,
        },
        &executor,
        Path::new("pmem2_integration"),
        &["test_reuse_cfg".to_string()],
    )
    .expect("run succeeds");
    assert!(outcome.success());

    let recorded = executor.recorded.borrow().clone().expect("executor ran");
    assert_eq!(recorded.program, PathBuf::from("pmem2_integration"));
    assert_eq!(
        recorded.env.get(FORCE_GRANULARITY_ENV).map(String::as_str),
        Some("BYTE")
    );
    assert_eq!(recorded.cwd.as_deref(), ctx.testdir().ok());
}

#[test]
fn runner_cleans_up_after_failing_test() {
    let base = TempDir::new().expect("tempdir");
    let ctx = byte_context(base.path());
    let executor = FakeExecutor::reporting(1);
    let outcome = run_test_case(
        &ctx,
        &FakeProbe {
            passes: true,
        },
        &executor,
        Path::new("pmem2_integration"),
        &[],
    )
    .expect("run completes");
    assert!(!outcome.success());
    assert!(!ctx.testdir().expect("fs context has testdir").exists());
}

#[test]
fn setup_failure_prevents_execution() {
    let base = TempDir::new().expect("tempdir");
    let ctx = byte_context(base.path());
    let executor = FakeExecutor::reporting(0);
    let err = run_test_case(
        &ctx,
        &FakeProbe {
            passes: false,
        },
        &executor,
        Path::new("pmem2_integration"),
        &[],
    )
    .expect_err("expected setup failure");
    assert!(matches!(err, RunError::Setup(_)));
    assert!(executor.recorded.borrow().is_none());
}

#[test]
fn setup_failure_leaves_no_testdir_residue() {
    let base = TempDir::new().expect("tempdir");
    let ctx = byte_context(base.path());
    let executor = FakeExecutor::reporting(0);
    // Directory creation happens before the probe gate, so a mismatch must
    // still tear the directory down.
    let err = run_test_case(
        &ctx,
        &FakeProbe {
            passes: false,
        },
        &executor,
        Path::new("pmem2_integration"),
        &[],
    )
    .expect_err("expected setup failure");
    assert!(matches!(err, RunError::Setup(_)));
    assert!(!ctx.testdir().expect("fs context has testdir").exists());
}

#[test]
fn no_filesystem_context_runs_without_working_directory() {
    let ctx = GranularityContext::None(NoFsContext::new());
    let executor = FakeExecutor::reporting(0);
    run_test_case(
        &ctx,
        &FakeProbe {
            passes: false,
        },
        &executor,
        Path::new("pmem2_integration"),
        &[],
    )
    .expect("sentinel run succeeds");
    let recorded = executor.recorded.borrow().clone().expect("executor ran");
    assert!(recorded.env.is_empty());
    assert_eq!(recorded.cwd, None);
}
