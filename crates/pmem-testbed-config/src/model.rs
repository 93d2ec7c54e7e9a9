// crates/pmem-testbed-config/src/model.rs
// ============================================================================
// Module: Test Bed Configuration File Model
// Description: TOML file model, input guards, and validation.
// Purpose: Turn a configuration file into the core's read-only model.
// Dependencies: pmem-testbed-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! The configuration file names, per granularity kind, an optional base
//! directory (`<kind>_fs_dir`) and a forcing flag (`force_<kind>`). Loading
//! enforces strict input guards before parsing and validates that forcing is
//! only enabled for kinds with a configured directory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use pmem_testbed_core::Granularity;
use pmem_testbed_core::TestBedConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::env::EnvOverrides;

// ============================================================================
// SECTION: Input Guards
// ============================================================================

/// Maximum accepted configuration path length in bytes.
const MAX_CONFIG_PATH_BYTES: usize = 4096;

/// Maximum accepted path component length in bytes.
const MAX_PATH_COMPONENT_BYTES: usize = 255;

/// Maximum accepted configuration file size in bytes.
const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// # Invariants
/// - Loading never panics; every failure is a value.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration path exceeds the accepted length.
    #[error("config path exceeds max length of {MAX_CONFIG_PATH_BYTES} bytes")]
    PathTooLong,
    /// A configuration path component exceeds the accepted length.
    #[error("config path component too long (max {MAX_PATH_COMPONENT_BYTES} bytes)")]
    PathComponentTooLong,
    /// The configuration file could not be read.
    #[error("config file read failed: {0}")]
    Io(String),
    /// The configuration file exceeds the accepted size.
    #[error("config file exceeds size limit of {MAX_CONFIG_FILE_BYTES} bytes")]
    FileTooLarge,
    /// The configuration file is not valid UTF-8.
    #[error("config file must be utf-8")]
    NotUtf8,
    /// The configuration file is not valid TOML.
    #[error("config parse failed: {0}")]
    Parse(String),
    /// The configuration is structurally valid but semantically wrong.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// An environment override is malformed.
    #[error("invalid environment override: {0}")]
    Env(String),
}

// ============================================================================
// SECTION: File Model
// ============================================================================

/// Raw TOML file model, all fields optional.
///
/// # Invariants
/// - Unknown fields are rejected to catch misspelled kind names early.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestBedConfigFile {
    /// Base directory for byte-granularity tests.
    pub byte_fs_dir: Option<PathBuf>,
    /// Enables environment forcing for byte granularity.
    pub force_byte: Option<bool>,
    /// Base directory for cache-line-granularity tests.
    pub cacheline_fs_dir: Option<PathBuf>,
    /// Enables environment forcing for cache-line granularity.
    pub force_cacheline: Option<bool>,
    /// Base directory for page-granularity tests.
    pub page_fs_dir: Option<PathBuf>,
    /// Enables environment forcing for page granularity.
    pub force_page: Option<bool>,
}

impl TestBedConfigFile {
    /// Validates the file model and produces the core configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when forcing is enabled for a kind
    /// with no configured directory.
    pub fn into_config(self) -> Result<TestBedConfig, ConfigError> {
        let config = TestBedConfig {
            byte_fs_dir: self.byte_fs_dir,
            force_byte: self.force_byte.unwrap_or(false),
            cacheline_fs_dir: self.cacheline_fs_dir,
            force_cacheline: self.force_cacheline.unwrap_or(false),
            page_fs_dir: self.page_fs_dir,
            force_page: self.force_page.unwrap_or(false),
        };
        validate(&config)?;
        Ok(config)
    }
}

/// Validates cross-field constraints on the loaded configuration.
fn validate(config: &TestBedConfig) -> Result<(), ConfigError> {
    for kind in Granularity::ALL {
        if config.force(kind) && config.fs_dir(kind).is_none() {
            return Err(ConfigError::Invalid(format!(
                "'{}' requires '{}' to be configured",
                kind.config_force_field(),
                kind.config_dir_field()
            )));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Parses a configuration from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError`] when parsing or validation fails.
pub fn from_toml_str(text: &str) -> Result<TestBedConfig, ConfigError> {
    let file: TestBedConfigFile =
        toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
    file.into_config()
}

/// Loads a configuration file with strict input guards.
///
/// # Errors
///
/// Returns [`ConfigError`] when the path fails guards, the file cannot be
/// read, exceeds the size limit, is not UTF-8, fails to parse, or fails
/// validation.
pub fn load(path: &Path) -> Result<TestBedConfig, ConfigError> {
    guard_path(path)?;
    let metadata = fs::metadata(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    if metadata.len() > MAX_CONFIG_FILE_BYTES {
        return Err(ConfigError::FileTooLarge);
    }
    let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|_| ConfigError::NotUtf8)?;
    from_toml_str(&text)
}

/// Loads a configuration and applies environment overrides.
///
/// With no path, the configuration starts empty and is populated from the
/// environment alone.
///
/// # Errors
///
/// Returns [`ConfigError`] when loading fails or an override is malformed.
pub fn load_with_env(path: Option<&Path>) -> Result<TestBedConfig, ConfigError> {
    let config = match path {
        Some(path) => load(path)?,
        None => TestBedConfig::default(),
    };
    let config = EnvOverrides::load()?.apply(config);
    validate(&config)?;
    Ok(config)
}

/// Enforces path-shape guards before touching the filesystem.
fn guard_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_CONFIG_PATH_BYTES {
        return Err(ConfigError::PathTooLong);
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_BYTES {
            return Err(ConfigError::PathComponentTooLong);
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
