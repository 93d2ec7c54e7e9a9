// crates/pmem-testbed-config/src/lib.rs
// ============================================================================
// Module: Pmem Testbed Config
// Description: Loading and validation of test-bed configuration.
// Purpose: Produce the core's read-only test-bed model from TOML and env.
// Dependencies: pmem-testbed-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! This crate loads the per-run test-bed configuration: which directories
//! exist for which granularity and whether forcing is enabled per kind. The
//! configuration file is TOML with strict input guards (path length, file
//! size, UTF-8); environment variables override file values. The loaded
//! [`pmem_testbed_core::TestBedConfig`] is read-only for the rest of the
//! process.
//! Invariants:
//! - Loading fails closed: unknown fields, oversized files, and non-UTF-8
//!   input are rejected.
//! - Enabling forcing for a kind without a configured directory is invalid.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod env;
pub mod model;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use env::EnvOverrides;
pub use env::TestBedEnv;
pub use model::ConfigError;
pub use model::TestBedConfigFile;
pub use model::from_toml_str;
pub use model::load;
pub use model::load_with_env;
