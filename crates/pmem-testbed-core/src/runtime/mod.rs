// crates/pmem-testbed-core/src/runtime/mod.rs
// ============================================================================
// Module: Pmem Testbed Runtime
// Description: Context resolution and test-case run orchestration.
// Purpose: Group the operations performed per test-case run.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Runtime operations: resolving a test case's declared requirement into
//! concrete contexts, and the uniform setup/exec/teardown run contract.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod resolver;
pub mod runner;
