// crates/pmem-testbed-core/src/lib.rs
// ============================================================================
// Module: Pmem Testbed Core
// Description: Granularity-aware execution contexts for pmem test cases.
// Purpose: Resolve declared granularity requirements into runnable contexts.
// Dependencies: thiserror, tracing
// ============================================================================

//! ## Overview
//! This crate selects and prepares the persistent-memory granularity
//! execution context for a test case. Tests declare which granularities they
//! require (exact kinds, "cache line or less", "page or less", any, or no
//! filesystem at all); the resolver matches the declaration against the
//! test-bed configuration, constructs one context per surviving kind, and
//! the runner drives the uniform setup/exec/teardown contract against the
//! external probe and executor collaborators.
//! Invariants:
//! - Invalid requirement values fail at declaration time, never at run time.
//! - A kind with no configured directory is never a resolution candidate.
//! - The no-filesystem sentinel forbids any directory access.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::context::ContextError;
pub use crate::core::context::ContextSkip;
pub use crate::core::context::FsContext;
pub use crate::core::context::GranularityContext;
pub use crate::core::context::NoFsContext;
pub use crate::core::context::SetupError;
pub use crate::core::granularity::FORCE_GRANULARITY_ENV;
pub use crate::core::granularity::Granularity;
pub use crate::core::granularity::LEGACY_FORCE_ENV;
pub use crate::core::granularity::PROBE_DETECT_FLAG;
pub use crate::core::requirement::ContextOptions;
pub use crate::core::requirement::DeclaredRequirement;
pub use crate::core::requirement::GranularityRequirement;
pub use crate::core::requirement::RequirementError;
pub use crate::core::requirement::RequirementKind;
pub use crate::core::requirement::RequirementValue;
pub use crate::core::requirement::TestCaseSpec;
pub use crate::core::testbed::TestBedConfig;
pub use crate::interfaces::ExecError;
pub use crate::interfaces::ExecOutcome;
pub use crate::interfaces::ExecRequest;
pub use crate::interfaces::GranularityProbe;
pub use crate::interfaces::ProbeError;
pub use crate::interfaces::ProbeReport;
pub use crate::interfaces::TestExecutor;
pub use crate::runtime::resolver::resolve_contexts;
pub use crate::runtime::runner::RunError;
pub use crate::runtime::runner::run_test_case;
