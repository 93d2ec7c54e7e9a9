// crates/pmem-testbed-tools/src/probe.rs
// ============================================================================
// Module: Granularity Probe Invoker
// Description: Invokes the native gran_detecto diagnostic tool.
// Purpose: Empirically assert or detect a directory's granularity.
// Dependencies: pmem-testbed-core, std::process, tracing
// ============================================================================

//! ## Overview
//! The probe tool takes a directory path and a single flag: `-p`, `-c`, or
//! `-b` to assert page, cache-line, or byte granularity, or `-d` to report
//! the detected granularity. Exit code 0 means the assertion holds. A
//! nonzero exit is a failed report, not an invocation error; only an
//! unspawnable tool is an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use pmem_testbed_core::Granularity;
use pmem_testbed_core::GranularityProbe;
use pmem_testbed_core::PROBE_DETECT_FLAG;
use pmem_testbed_core::ProbeError;
use pmem_testbed_core::ProbeReport;

// ============================================================================
// SECTION: Probe Invoker
// ============================================================================

/// Process-backed probe invoking the `gran_detecto` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GranDetecto {
    /// Path to the probe binary.
    binary: PathBuf,
}

impl GranDetecto {
    /// Creates an invoker for the given probe binary.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Runs the probe with one flag against a directory.
    fn run(&self, dir: &Path, flag: &str) -> Result<ProbeReport, ProbeError> {
        tracing::debug!(binary = %self.binary.display(), flag, dir = %dir.display(), "invoking probe");
        let output = Command::new(&self.binary)
            .arg(flag)
            .arg(dir)
            .output()
            .map_err(|err| ProbeError::Invocation(format!("{}: {err}", self.binary.display())))?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(ProbeReport {
            passed: output.status.success(),
            output: text,
        })
    }
}

impl GranularityProbe for GranDetecto {
    fn check(&self, dir: &Path, granularity: Granularity) -> Result<ProbeReport, ProbeError> {
        self.run(dir, granularity.probe_flag())
    }

    fn detect(&self, dir: &Path) -> Result<ProbeReport, ProbeError> {
        self.run(dir, PROBE_DETECT_FLAG)
    }
}
