// crates/pmem-testbed-core/src/core/granularity.rs
// ============================================================================
// Module: Granularity Variant Set
// Description: Closed set of filesystem granularity kinds and their metadata.
// Purpose: Describe how each kind maps to configuration, forcing, and probing.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A granularity is the smallest unit at which persistent-memory writes must
//! be flushed to guarantee durability. The three filesystem-backed kinds are
//! ordered smallest first: byte, cache line, page. Per-kind metadata is
//! static data dispatched by pattern matching, not dynamic lookup.
//!
//! The "no filesystem" sentinel is deliberately not a variant here; it is a
//! separate context variant that carries no metadata and forbids directory
//! access (see `crate::core::context`).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Primary environment variable selecting granularity forcing.
pub const FORCE_GRANULARITY_ENV: &str = "PMEM2_FORCE_GRANULARITY";

/// Legacy boolean forcing variable kept for older library generations.
pub const LEGACY_FORCE_ENV: &str = "PMEM_IS_PMEM_FORCE";

/// Probe flag requesting detection instead of assertion.
pub const PROBE_DETECT_FLAG: &str = "-d";

// ============================================================================
// SECTION: Granularity Kinds
// ============================================================================

/// Filesystem-backed granularity kinds, ordered smallest first.
///
/// # Invariants
/// - Variant order defines the total order `Byte < CacheLine < Page` used by
///   "or-less" narrowing; do not reorder variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Granularity {
    /// Byte granularity: stores are durable without explicit flushing.
    Byte,
    /// Cache-line granularity: stores must be flushed per cache line.
    CacheLine,
    /// Page granularity: OS-page-cache backed, not truly persistent.
    Page,
}

impl Granularity {
    /// All kinds, smallest first.
    pub const ALL: [Self; 3] = [Self::Byte, Self::CacheLine, Self::Page];

    /// Returns a stable lowercase label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::CacheLine => "cache_line",
            Self::Page => "page",
        }
    }

    /// Returns the configuration field naming this kind's base directory.
    #[must_use]
    pub const fn config_dir_field(self) -> &'static str {
        match self {
            Self::Byte => "byte_fs_dir",
            Self::CacheLine => "cacheline_fs_dir",
            Self::Page => "page_fs_dir",
        }
    }

    /// Returns the configuration field enabling environment forcing.
    #[must_use]
    pub const fn config_force_field(self) -> &'static str {
        match self {
            Self::Byte => "force_byte",
            Self::CacheLine => "force_cacheline",
            Self::Page => "force_page",
        }
    }

    /// Returns the value assigned to [`FORCE_GRANULARITY_ENV`] when forcing.
    #[must_use]
    pub const fn force_env_value(self) -> &'static str {
        match self {
            Self::Byte => "BYTE",
            Self::CacheLine => "CACHE_LINE",
            Self::Page => "PAGE",
        }
    }

    /// Returns the value assigned to [`LEGACY_FORCE_ENV`] when forcing.
    ///
    /// Page granularity is not pmem from the legacy library's point of view,
    /// so it maps to `0` while the smaller kinds map to `1`.
    #[must_use]
    pub const fn legacy_force_value(self) -> &'static str {
        match self {
            Self::Byte | Self::CacheLine => "1",
            Self::Page => "0",
        }
    }

    /// Returns the probe flag asserting this kind against a directory.
    #[must_use]
    pub const fn probe_flag(self) -> &'static str {
        match self {
            Self::Byte => "-b",
            Self::CacheLine => "-c",
            Self::Page => "-p",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
