// crates/pmem-testbed-core/src/core/testbed.rs
// ============================================================================
// Module: Test Bed Configuration Model
// Description: Read-only per-run test-bed capability description.
// Purpose: Expose which directories exist at which granularity.
// Dependencies: crate::core::granularity
// ============================================================================

//! ## Overview
//! The test-bed configuration says, per granularity kind, whether a usable
//! directory is configured and whether environment forcing is enabled for
//! it. It is loaded once per process (see the `pmem-testbed-config` crate)
//! and passed by reference into the resolver and each context; the core
//! never mutates it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use crate::core::granularity::Granularity;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Per-run test-bed configuration.
///
/// # Invariants
/// - A kind with no configured directory is never a resolution candidate.
/// - Read-only after load; contexts and the resolver never mutate it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestBedConfig {
    /// Base directory for byte-granularity tests.
    pub byte_fs_dir: Option<PathBuf>,
    /// Enables environment forcing for byte granularity.
    pub force_byte: bool,
    /// Base directory for cache-line-granularity tests.
    pub cacheline_fs_dir: Option<PathBuf>,
    /// Enables environment forcing for cache-line granularity.
    pub force_cacheline: bool,
    /// Base directory for page-granularity tests.
    pub page_fs_dir: Option<PathBuf>,
    /// Enables environment forcing for page granularity.
    pub force_page: bool,
}

impl TestBedConfig {
    /// Returns the configured base directory for a kind, if any.
    #[must_use]
    pub fn fs_dir(&self, granularity: Granularity) -> Option<&Path> {
        match granularity {
            Granularity::Byte => self.byte_fs_dir.as_deref(),
            Granularity::CacheLine => self.cacheline_fs_dir.as_deref(),
            Granularity::Page => self.page_fs_dir.as_deref(),
        }
    }

    /// Returns whether environment forcing is enabled for a kind.
    #[must_use]
    pub const fn force(&self, granularity: Granularity) -> bool {
        match granularity {
            Granularity::Byte => self.force_byte,
            Granularity::CacheLine => self.force_cacheline,
            Granularity::Page => self.force_page,
        }
    }

    /// Returns the kinds with a configured directory, smallest first.
    #[must_use]
    pub fn available(&self) -> Vec<Granularity> {
        Granularity::ALL.into_iter().filter(|kind| self.fs_dir(*kind).is_some()).collect()
    }
}
