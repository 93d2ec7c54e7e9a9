// crates/pmem-testbed-config/src/env.rs
// ============================================================================
// Module: Test Bed Environment Overrides
// Description: Environment-backed overrides for test-bed configuration.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: pmem-testbed-core, std
// ============================================================================

//! ## Overview
//! Environment values override file values so a test bed can be pointed at
//! different mounts without editing the configuration file. Values are
//! parsed with strict UTF-8 enforcement to avoid silent misconfiguration;
//! invalid UTF-8 fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use pmem_testbed_core::TestBedConfig;

use crate::model::ConfigError;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for test-bed configuration overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestBedEnv {
    /// Override for the byte-granularity base directory.
    ByteFsDir,
    /// Override for the byte forcing flag.
    ForceByte,
    /// Override for the cache-line-granularity base directory.
    CachelineFsDir,
    /// Override for the cache-line forcing flag.
    ForceCacheline,
    /// Override for the page-granularity base directory.
    PageFsDir,
    /// Override for the page forcing flag.
    ForcePage,
}

impl TestBedEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ByteFsDir => "PMEM_TESTBED_BYTE_FS_DIR",
            Self::ForceByte => "PMEM_TESTBED_FORCE_BYTE",
            Self::CachelineFsDir => "PMEM_TESTBED_CACHELINE_FS_DIR",
            Self::ForceCacheline => "PMEM_TESTBED_FORCE_CACHELINE",
            Self::PageFsDir => "PMEM_TESTBED_PAGE_FS_DIR",
            Self::ForcePage => "PMEM_TESTBED_FORCE_PAGE",
        }
    }
}

// ============================================================================
// SECTION: Override Set
// ============================================================================

/// Typed override set derived from environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Byte directory override.
    pub byte_fs_dir: Option<PathBuf>,
    /// Byte forcing override.
    pub force_byte: Option<bool>,
    /// Cache-line directory override.
    pub cacheline_fs_dir: Option<PathBuf>,
    /// Cache-line forcing override.
    pub force_cacheline: Option<bool>,
    /// Page directory override.
    pub page_fs_dir: Option<PathBuf>,
    /// Page forcing override.
    pub force_page: Option<bool>,
}

impl EnvOverrides {
    /// Loads overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] when a value is not valid UTF-8, is
    /// empty, or fails boolean parsing.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var_os(name).map(|raw| raw.into_string()))
    }

    /// Builds overrides from an environment lookup function.
    ///
    /// The lookup returns `None` for unset variables and `Err` for values
    /// that are not valid UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] when a value is not valid UTF-8, is
    /// empty, or fails boolean parsing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<Result<String, std::ffi::OsString>>,
    {
        Ok(Self {
            byte_fs_dir: read_path(&lookup, TestBedEnv::ByteFsDir)?,
            force_byte: read_bool(&lookup, TestBedEnv::ForceByte)?,
            cacheline_fs_dir: read_path(&lookup, TestBedEnv::CachelineFsDir)?,
            force_cacheline: read_bool(&lookup, TestBedEnv::ForceCacheline)?,
            page_fs_dir: read_path(&lookup, TestBedEnv::PageFsDir)?,
            force_page: read_bool(&lookup, TestBedEnv::ForcePage)?,
        })
    }

    /// Applies the overrides on top of a loaded configuration.
    #[must_use]
    pub fn apply(self, mut config: TestBedConfig) -> TestBedConfig {
        if let Some(dir) = self.byte_fs_dir {
            config.byte_fs_dir = Some(dir);
        }
        if let Some(force) = self.force_byte {
            config.force_byte = force;
        }
        if let Some(dir) = self.cacheline_fs_dir {
            config.cacheline_fs_dir = Some(dir);
        }
        if let Some(force) = self.force_cacheline {
            config.force_cacheline = force;
        }
        if let Some(dir) = self.page_fs_dir {
            config.page_fs_dir = Some(dir);
        }
        if let Some(force) = self.force_page {
            config.force_page = force;
        }
        config
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a non-empty string value with strict UTF-8 enforcement.
fn read_nonempty<F>(lookup: &F, key: TestBedEnv) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<Result<String, std::ffi::OsString>>,
{
    let name = key.as_str();
    match lookup(name) {
        None => Ok(None),
        Some(Err(_)) => Err(ConfigError::Env(format!("{name} must be valid UTF-8"))),
        Some(Ok(value)) if value.trim().is_empty() => {
            Err(ConfigError::Env(format!("{name} must not be empty")))
        }
        Some(Ok(value)) => Ok(Some(value)),
    }
}

/// Reads a directory path override.
fn read_path<F>(lookup: &F, key: TestBedEnv) -> Result<Option<PathBuf>, ConfigError>
where
    F: Fn(&str) -> Option<Result<String, std::ffi::OsString>>,
{
    Ok(read_nonempty(lookup, key)?.map(PathBuf::from))
}

/// Reads a boolean override (`1`/`0`/`true`/`false`).
fn read_bool<F>(lookup: &F, key: TestBedEnv) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<Result<String, std::ffi::OsString>>,
{
    let Some(value) = read_nonempty(lookup, key)? else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
        return Ok(Some(true));
    }
    if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
        return Ok(Some(false));
    }
    Err(ConfigError::Env(format!("{} must be 1, 0, true, or false", key.as_str())))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
