// crates/pmem-testbed-core/src/core/mod.rs
// ============================================================================
// Module: Pmem Testbed Core Types
// Description: Granularity kinds, requirements, configuration, and contexts.
// Purpose: Group the data model shared by the resolver and runner.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! Core data model for the granularity harness: the closed variant set, the
//! per-test-case requirement registry, the read-only test-bed configuration,
//! and the resolved execution contexts.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod context;
pub mod granularity;
pub mod requirement;
pub mod testbed;
