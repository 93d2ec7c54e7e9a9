// crates/pmem-testbed-core/src/core/requirement.rs
// ============================================================================
// Module: Requirement Registry
// Description: Per-test-case capability requirement declarations.
// Purpose: Attach validated requirements to test-case descriptors.
// Dependencies: crate::core::granularity, thiserror
// ============================================================================

//! ## Overview
//! A test case declares the capabilities it needs before it is resolved
//! against a test bed. The registry is a generic table keyed by requirement
//! kind; granularity is the only kind today, but the mechanism is reusable.
//! Invalid requirement values fail synchronously at declaration time, never
//! at run time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::core::granularity::Granularity;

// ============================================================================
// SECTION: Requirement Kinds
// ============================================================================

/// Capability requirement kinds a test case may declare.
///
/// # Invariants
/// - At most one requirement per kind is attached to a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RequirementKind {
    /// Filesystem granularity requirement.
    Granularity,
}

impl RequirementKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Granularity => "granularity",
        }
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Granularity Requirements
// ============================================================================

/// Declared granularity requirement for a test case.
///
/// # Invariants
/// - `Exact` lists at least one kind and names no kind twice (validated at
///   declaration time).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GranularityRequirement {
    /// Exactly the named kinds, attempted in declaration order.
    Exact(Vec<Granularity>),
    /// Cache-line granularity or any strictly smaller one.
    CacheLineOrLess,
    /// Page granularity or any strictly smaller one.
    PageOrLess,
    /// Any single available kind.
    Any,
    /// No filesystem is used; granularity is irrelevant to the test.
    NoFilesystem,
}

impl GranularityRequirement {
    /// Validates the requirement value at declaration time.
    ///
    /// # Errors
    ///
    /// Returns [`RequirementError`] when an exact list is empty or names the
    /// same kind more than once.
    pub fn validate(&self) -> Result<(), RequirementError> {
        let Self::Exact(kinds) = self else {
            return Ok(());
        };
        if kinds.is_empty() {
            return Err(RequirementError::EmptyExactList);
        }
        for (index, kind) in kinds.iter().enumerate() {
            if kinds[..index].contains(kind) {
                return Err(RequirementError::DuplicateGranularity {
                    granularity: *kind,
                });
            }
        }
        Ok(())
    }
}

/// Requirement value attached to a test case, tagged by kind.
///
/// # Invariants
/// - The value tag matches the [`RequirementKind`] it is registered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementValue {
    /// Granularity requirement payload.
    Granularity(GranularityRequirement),
}

impl RequirementValue {
    /// Returns the requirement kind this value belongs to.
    #[must_use]
    pub const fn kind(&self) -> RequirementKind {
        match self {
            Self::Granularity(_) => RequirementKind::Granularity,
        }
    }
}

// ============================================================================
// SECTION: Context Options
// ============================================================================

/// Auxiliary parameters passed through to context construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextOptions {
    /// Custom subdirectory name overriding the test case's directory tag.
    pub subdir: Option<String>,
}

// ============================================================================
// SECTION: Declaration Errors
// ============================================================================

/// Declaration-time requirement errors.
///
/// # Invariants
/// - Raised synchronously when the requirement is declared, never deferred
///   to resolution or run time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequirementError {
    /// A requirement of the same kind is already attached.
    #[error("requirement of kind '{kind}' already declared for this test case")]
    AlreadyDeclared {
        /// Kind that was declared twice.
        kind: RequirementKind,
    },
    /// An exact granularity list named no kinds.
    #[error("exact granularity requirement must name at least one kind")]
    EmptyExactList,
    /// An exact granularity list named the same kind twice.
    #[error("exact granularity requirement names '{granularity}' more than once")]
    DuplicateGranularity {
        /// Kind that appeared more than once.
        granularity: Granularity,
    },
}

// ============================================================================
// SECTION: Test Case Descriptor
// ============================================================================

/// Entry stored in a test case's requirement table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredRequirement {
    /// Validated requirement value.
    pub value: RequirementValue,
    /// Pass-through construction options.
    pub options: ContextOptions,
}

/// Test-case descriptor carrying the declared requirement table.
///
/// # Invariants
/// - `dir_tag` scopes the test case's directories under a configured base
///   directory; concurrently resolved test cases must use distinct tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseSpec {
    /// Test case name.
    name: String,
    /// Directory tag used to scope per-test-case subdirectories.
    dir_tag: String,
    /// Declared requirements keyed by kind.
    requirements: BTreeMap<RequirementKind, DeclaredRequirement>,
}

impl TestCaseSpec {
    /// Creates a descriptor whose directory tag defaults to the name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let dir_tag = name.clone();
        Self {
            name,
            dir_tag,
            requirements: BTreeMap::new(),
        }
    }

    /// Overrides the directory tag.
    #[must_use]
    pub fn with_dir_tag(mut self, dir_tag: impl Into<String>) -> Self {
        self.dir_tag = dir_tag.into();
        self
    }

    /// Returns the test case name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the directory tag.
    #[must_use]
    pub fn dir_tag(&self) -> &str {
        &self.dir_tag
    }

    /// Attaches a requirement to the test case.
    ///
    /// # Errors
    ///
    /// Returns [`RequirementError`] when the value fails validation or a
    /// requirement of the same kind is already attached.
    pub fn add_requirement(
        &mut self,
        value: RequirementValue,
        options: ContextOptions,
    ) -> Result<(), RequirementError> {
        let kind = value.kind();
        if self.requirements.contains_key(&kind) {
            return Err(RequirementError::AlreadyDeclared {
                kind,
            });
        }
        let RequirementValue::Granularity(granularity) = &value;
        granularity.validate()?;
        self.requirements.insert(kind, DeclaredRequirement {
            value,
            options,
        });
        Ok(())
    }

    /// Returns the declared requirement of the given kind, if any.
    #[must_use]
    pub fn requirement(&self, kind: RequirementKind) -> Option<&DeclaredRequirement> {
        self.requirements.get(&kind)
    }

    /// Declares a granularity requirement.
    ///
    /// # Errors
    ///
    /// Returns [`RequirementError`] when the value fails validation or a
    /// granularity requirement is already attached.
    pub fn require_granularity(
        &mut self,
        requirement: GranularityRequirement,
        options: ContextOptions,
    ) -> Result<(), RequirementError> {
        self.add_requirement(RequirementValue::Granularity(requirement), options)
    }

    /// Declares that the test uses no filesystem at all.
    ///
    /// # Errors
    ///
    /// Returns [`RequirementError`] when a granularity requirement is already
    /// attached.
    pub fn no_testdir(&mut self) -> Result<(), RequirementError> {
        self.require_granularity(GranularityRequirement::NoFilesystem, ContextOptions::default())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
