// crates/pmem-testbed-core/src/interfaces/mod.rs
// ============================================================================
// Module: Pmem Testbed Interfaces
// Description: Backend-agnostic interfaces for probing and test execution.
// Purpose: Define the contract surfaces used by the resolver and runner.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the harness integrates with external tools without
//! embedding process-spawning details in the core. The diagnostic probe
//! asserts that a directory's filesystem actually delivers the claimed
//! granularity; the test executor runs the external system-under-test
//! binary. Both are synchronous, blocking calls with no internal timeout or
//! retry; a failure is reported, not retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use crate::core::granularity::Granularity;

// ============================================================================
// SECTION: Diagnostic Probe
// ============================================================================

/// Outcome of one probe invocation.
///
/// # Invariants
/// - `passed` reflects the probe's exit status; `output` carries captured
///   diagnostic text regardless of outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Whether the probe's assertion held.
    pub passed: bool,
    /// Captured diagnostic output.
    pub output: String,
}

/// Probe invocation errors.
///
/// # Invariants
/// - Raised only when the probe cannot run at all; a failed assertion is a
///   [`ProbeReport`] with `passed == false`, not an error.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The probe tool could not be invoked.
    #[error("granularity probe invocation failed: {0}")]
    Invocation(String),
}

/// Diagnostic probe asserting or detecting filesystem granularity.
pub trait GranularityProbe {
    /// Asserts that `dir`'s filesystem delivers the given granularity.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the probe cannot be invoked.
    fn check(&self, dir: &Path, granularity: Granularity) -> Result<ProbeReport, ProbeError>;

    /// Reports the granularity `dir`'s filesystem actually delivers.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the probe cannot be invoked.
    fn detect(&self, dir: &Path) -> Result<ProbeReport, ProbeError>;
}

// ============================================================================
// SECTION: Test Executor
// ============================================================================

/// Request to run an external test executable.
///
/// # Invariants
/// - `env` is overlaid on the inherited process environment.
/// - `cwd` is absent for no-filesystem contexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest<'a> {
    /// Program to run.
    pub program: &'a Path,
    /// Program arguments.
    pub args: &'a [String],
    /// Environment overlay from the resolved context.
    pub env: &'a BTreeMap<String, String>,
    /// Optional working directory.
    pub cwd: Option<&'a Path>,
}

/// Outcome of one external test execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Exit code, absent when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ExecOutcome {
    /// Returns whether the execution exited successfully.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Execution errors.
///
/// # Invariants
/// - Raised only when the executable cannot be spawned; a nonzero exit is an
///   [`ExecOutcome`], not an error.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The test executable could not be spawned.
    #[error("test executable spawn failed: {0}")]
    Spawn(String),
}

/// External process-execution collaborator.
pub trait TestExecutor {
    /// Runs the external test executable, blocking until it exits.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] when the executable cannot be spawned.
    fn exec(&self, request: &ExecRequest<'_>) -> Result<ExecOutcome, ExecError>;
}
