// crates/pmem-testbed-tools/src/lib.rs
// ============================================================================
// Module: Pmem Testbed Tools
// Description: Process-backed implementations of the core interfaces.
// Purpose: Invoke the native probe tool and external test executables.
// Dependencies: pmem-testbed-core, tracing
// ============================================================================

//! ## Overview
//! This crate ships the two process-backed collaborators the core expects:
//! the `gran_detecto` diagnostic probe invoker and a synchronous external
//! test executor. Both block on the spawned process with no internal timeout
//! or retry; failures are reported to the caller, not retried.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod exec;
pub mod probe;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use exec::ProcessExecutor;
pub use probe::GranDetecto;
