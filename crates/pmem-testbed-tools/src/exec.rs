// crates/pmem-testbed-tools/src/exec.rs
// ============================================================================
// Module: External Test Executor
// Description: Spawns external test executables with a context overlay.
// Purpose: Run the system-under-test binary for one resolved context.
// Dependencies: pmem-testbed-core, std::process, tracing
// ============================================================================

//! ## Overview
//! The executor overlays the resolved context's environment variables on the
//! inherited process environment, optionally changes into the context's test
//! directory, and blocks until the executable exits. A nonzero exit is
//! reported in the outcome; only an unspawnable executable is an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::process::Command;

use pmem_testbed_core::ExecError;
use pmem_testbed_core::ExecOutcome;
use pmem_testbed_core::ExecRequest;
use pmem_testbed_core::TestExecutor;

// ============================================================================
// SECTION: Process Executor
// ============================================================================

/// Synchronous process-backed test executor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    /// Creates the executor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TestExecutor for ProcessExecutor {
    fn exec(&self, request: &ExecRequest<'_>) -> Result<ExecOutcome, ExecError> {
        tracing::debug!(program = %request.program.display(), "spawning external test executable");
        let mut command = Command::new(request.program);
        command.args(request.args).envs(request.env);
        if let Some(cwd) = request.cwd {
            command.current_dir(cwd);
        }
        let output = command
            .output()
            .map_err(|err| ExecError::Spawn(format!("{}: {err}", request.program.display())))?;
        Ok(ExecOutcome {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
