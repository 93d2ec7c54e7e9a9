// crates/pmem-testbed-core/src/runtime/runner.rs
// ============================================================================
// Module: Test Case Runner
// Description: Generic "run external test case" orchestration.
// Purpose: Provide the uniform setup/exec/teardown contract per context.
// Dependencies: crate::core, crate::interfaces, thiserror, tracing
// ============================================================================

//! ## Overview
//! Once a context is resolved, running the external test case follows a
//! fixed contract: setup (directory creation plus probe verification), one
//! blocking execution of the external test executable with the context's
//! environment overlay, then unconditional best-effort cleanup. Cleanup runs
//! on every exit path, including a failed setup: directory creation precedes
//! the probe gate, so a mismatch leaves a directory behind that must not
//! survive the run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use thiserror::Error;

use crate::core::context::GranularityContext;
use crate::core::context::SetupError;
use crate::interfaces::ExecError;
use crate::interfaces::ExecOutcome;
use crate::interfaces::ExecRequest;
use crate::interfaces::GranularityProbe;
use crate::interfaces::TestExecutor;

// ============================================================================
// SECTION: Run Errors
// ============================================================================

/// Fatal errors for one test-case run.
///
/// # Invariants
/// - Setup failures are distinguishable from execution failures; an empty
///   resolution never reaches the runner.
#[derive(Debug, Error)]
pub enum RunError {
    /// Context setup failed before the test executable ran.
    #[error("context setup failed: {0}")]
    Setup(#[from] SetupError),
    /// The external test executable could not be run.
    #[error("test execution failed: {0}")]
    Exec(#[from] ExecError),
}

// ============================================================================
// SECTION: Orchestration
// ============================================================================

/// Runs one external test case inside a resolved context.
///
/// The context's environment overlay is applied to the executable, and the
/// working directory is the context's test directory for filesystem-backed
/// contexts. A nonzero exit is reported in the returned [`ExecOutcome`], not
/// as an error; interpreting it is the caller's concern.
///
/// # Errors
///
/// Returns [`RunError`] when setup fails or the executable cannot be
/// spawned.
pub fn run_test_case(
    context: &GranularityContext,
    probe: &dyn GranularityProbe,
    executor: &dyn TestExecutor,
    program: &Path,
    args: &[String],
) -> Result<ExecOutcome, RunError> {
    if let Err(err) = context.setup(probe) {
        // Directory creation precedes the probe gate, so a failed setup may
        // already have created the test directory.
        context.cleanup();
        return Err(err.into());
    }
    tracing::debug!(
        context = context.label(),
        program = %program.display(),
        "running external test case"
    );

    let request = ExecRequest {
        program,
        args,
        env: context.env_overlay(),
        cwd: context.testdir().ok(),
    };
    let outcome = executor.exec(&request);
    context.cleanup();
    Ok(outcome?)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
