// crates/pmem-testbed-core/src/core/context.rs
// ============================================================================
// Module: Granularity Contexts
// Description: Per-test-case execution contexts bound to one granularity.
// Purpose: Own the test directory and forcing overlay across a test run.
// Dependencies: crate::core::{granularity, requirement, testbed},
// crate::interfaces, thiserror, tracing
// ============================================================================

//! ## Overview
//! A context is a fully configured, ready-to-run environment bound to one
//! granularity kind and one test case. Filesystem-backed contexts own a
//! per-test-case directory and, when forcing is enabled, an environment
//! overlay that pins the native library to the kind under test. The
//! no-filesystem context is a guarded sentinel: any directory access fails
//! immediately so accidental filesystem use is caught rather than silently
//! working.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::granularity::FORCE_GRANULARITY_ENV;
use crate::core::granularity::Granularity;
use crate::core::granularity::LEGACY_FORCE_ENV;
use crate::core::requirement::ContextOptions;
use crate::core::testbed::TestBedConfig;
use crate::interfaces::GranularityProbe;
use crate::interfaces::ProbeError;

// ============================================================================
// SECTION: Context Errors
// ============================================================================

/// Guarded-misuse errors for context accessors.
///
/// # Invariants
/// - Raised at the point of misuse; signals a test-authoring bug, not an
///   environment problem.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// A directory accessor was used on the no-filesystem context.
    #[error("'{field}' cannot be used if the test is meant not to use any filesystem")]
    NoFilesystem {
        /// Accessor that was used.
        field: &'static str,
    },
}

/// Non-fatal reason a candidate context could not be constructed.
///
/// # Invariants
/// - A skip drops one candidate; it never aborts the whole resolution.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct ContextSkip {
    /// Human-readable skip reason.
    pub reason: String,
}

impl ContextSkip {
    /// Creates a skip with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Fatal setup errors for one test-case run.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The test directory could not be created.
    #[error("failed to create test directory {}: {detail}", .path.display())]
    DirectoryCreate {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O failure detail.
        detail: String,
    },
    /// The probe disagreed with the claimed granularity.
    #[error("granularity check for {} failed: {probe_output}{detect_output}", .path.display())]
    Mismatch {
        /// Directory whose filesystem was probed.
        path: PathBuf,
        /// Output of the failed assertion run.
        probe_output: String,
        /// Output of the follow-up detection run.
        detect_output: String,
    },
    /// The probe tool itself could not be invoked.
    #[error(transparent)]
    Probe(#[from] ProbeError),
}

// ============================================================================
// SECTION: Filesystem Context
// ============================================================================

/// Execution context bound to one filesystem-backed granularity kind.
///
/// # Invariants
/// - `testdir` is absolute and scoped by the test case's directory tag; no
///   two concurrently resolved test cases share it.
/// - `env` holds the forcing overlay and is empty when forcing is disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsContext {
    /// Granularity kind this context is bound to.
    granularity: Granularity,
    /// Absolute per-test-case directory owned by this context.
    testdir: PathBuf,
    /// Environment overlay applied to the external test executable.
    env: BTreeMap<String, String>,
}

impl FsContext {
    /// Constructs a context for one kind from the test-bed configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ContextSkip`] when the kind has no configured directory,
    /// the configured directory cannot be made absolute, or the subdirectory
    /// option is unusable. Skips drop this candidate without aborting the
    /// resolution.
    pub fn new(
        config: &TestBedConfig,
        granularity: Granularity,
        dir_tag: &str,
        options: &ContextOptions,
    ) -> Result<Self, ContextSkip> {
        let base = config.fs_dir(granularity).ok_or_else(|| {
            ContextSkip::new(format!("no '{}' configured", granularity.config_dir_field()))
        })?;
        let base = std::path::absolute(base).map_err(|err| {
            ContextSkip::new(format!(
                "'{}' cannot be made absolute: {err}",
                granularity.config_dir_field()
            ))
        })?;

        let subdir = options.subdir.as_deref().unwrap_or(dir_tag);
        let mut components = Path::new(subdir).components();
        let single_normal =
            matches!((components.next(), components.next()), (Some(Component::Normal(_)), None));
        if !single_normal {
            return Err(ContextSkip::new(format!(
                "'{subdir}' is not usable as a test subdirectory name"
            )));
        }

        let mut env = BTreeMap::new();
        if config.force(granularity) {
            env.insert(FORCE_GRANULARITY_ENV.to_string(), granularity.force_env_value().to_string());
            // The primary variable is implemented only by the current native
            // library; the legacy variable keeps older generations honest.
            env.insert(LEGACY_FORCE_ENV.to_string(), granularity.legacy_force_value().to_string());
        }

        Ok(Self {
            granularity,
            testdir: base.join(subdir),
            env,
        })
    }

    /// Returns the granularity kind.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Returns the absolute per-test-case directory.
    #[must_use]
    pub fn testdir(&self) -> &Path {
        &self.testdir
    }

    /// Returns the environment overlay.
    #[must_use]
    pub const fn env_overlay(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Prepares the context: creates the directory and verifies granularity.
    ///
    /// Directory creation is idempotent. The probe assertion is a hard stop:
    /// a test bed whose filesystem does not deliver the claimed granularity
    /// must never silently run the test.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] when the directory cannot be created, the
    /// probe cannot be invoked, or the probe disagrees with the claimed
    /// granularity. Mismatch errors embed both the assertion output and a
    /// follow-up detection output.
    pub fn setup(&self, probe: &dyn GranularityProbe) -> Result<(), SetupError> {
        fs::create_dir_all(&self.testdir).map_err(|err| SetupError::DirectoryCreate {
            path: self.testdir.clone(),
            detail: err.to_string(),
        })?;

        let report = probe.check(&self.testdir, self.granularity)?;
        if report.passed {
            return Ok(());
        }
        let detect_output = probe
            .detect(&self.testdir)
            .map_or_else(|err| format!("granularity detection failed: {err}"), |detect| detect.output);
        Err(SetupError::Mismatch {
            path: self.testdir.clone(),
            probe_output: report.output,
            detect_output,
        })
    }

    /// Removes the owned directory tree, best effort.
    ///
    /// Absence and partial removal are not errors; cleanup is advisory, not
    /// a correctness gate, and calling it twice is safe.
    pub fn cleanup(&self) {
        if let Err(err) = fs::remove_dir_all(&self.testdir) {
            tracing::debug!(
                testdir = %self.testdir.display(),
                detail = %err,
                "test directory cleanup suppressed"
            );
        }
    }
}

// ============================================================================
// SECTION: No-Filesystem Context
// ============================================================================

/// Guarded sentinel context for tests that use no filesystem.
///
/// # Invariants
/// - Setup and cleanup are no-ops.
/// - Any directory access fails with [`ContextError::NoFilesystem`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoFsContext {
    /// Always-empty environment overlay.
    env: BTreeMap<String, String>,
}

impl NoFsContext {
    /// Creates the sentinel context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            env: BTreeMap::new(),
        }
    }

    /// Returns the always-empty environment overlay.
    #[must_use]
    pub const fn env_overlay(&self) -> &BTreeMap<String, String> {
        &self.env
    }
}

// ============================================================================
// SECTION: Unified Context
// ============================================================================

/// Resolved execution context handed to the test runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GranularityContext {
    /// Filesystem-backed context.
    Fs(FsContext),
    /// No-filesystem sentinel context.
    None(NoFsContext),
}

impl GranularityContext {
    /// Returns the bound granularity kind, or `None` for the sentinel.
    #[must_use]
    pub const fn granularity(&self) -> Option<Granularity> {
        match self {
            Self::Fs(fs_ctx) => Some(fs_ctx.granularity()),
            Self::None(_) => None,
        }
    }

    /// Returns a stable label for logging.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Fs(fs_ctx) => fs_ctx.granularity().as_str(),
            Self::None(_) => "none",
        }
    }

    /// Returns the per-test-case directory.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::NoFilesystem`] for the sentinel context; a
    /// test declared to use no filesystem must not touch any directory.
    pub fn testdir(&self) -> Result<&Path, ContextError> {
        match self {
            Self::Fs(fs_ctx) => Ok(fs_ctx.testdir()),
            Self::None(_) => Err(ContextError::NoFilesystem {
                field: "testdir",
            }),
        }
    }

    /// Returns the environment overlay.
    #[must_use]
    pub const fn env_overlay(&self) -> &BTreeMap<String, String> {
        match self {
            Self::Fs(fs_ctx) => fs_ctx.env_overlay(),
            Self::None(no_fs) => no_fs.env_overlay(),
        }
    }

    /// Prepares the context before the external test executable runs.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] when a filesystem-backed context cannot be
    /// prepared; the sentinel context always succeeds.
    pub fn setup(&self, probe: &dyn GranularityProbe) -> Result<(), SetupError> {
        match self {
            Self::Fs(fs_ctx) => fs_ctx.setup(probe),
            Self::None(_) => Ok(()),
        }
    }

    /// Tears the context down after the test finishes, best effort.
    pub fn cleanup(&self) {
        match self {
            Self::Fs(fs_ctx) => fs_ctx.cleanup(),
            Self::None(_) => {}
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
