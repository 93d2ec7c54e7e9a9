// crates/pmem-testbed-core/src/runtime/resolver.rs
// ============================================================================
// Module: Context Resolver
// Description: Resolves declared requirements into runnable contexts.
// Purpose: Select and construct the granularity contexts a test can run in.
// Dependencies: crate::core, tracing
// ============================================================================

//! ## Overview
//! The resolver reads a test case's declared granularity requirement,
//! intersects it with the test bed's availability, applies the "cheapest
//! sufficient" narrowing for or-less requirements, and constructs one
//! context per surviving kind. An empty result means "no runnable variant in
//! this environment" and is not an error; candidate-level skips are logged
//! at verbose level and dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::context::FsContext;
use crate::core::context::GranularityContext;
use crate::core::context::NoFsContext;
use crate::core::granularity::Granularity;
use crate::core::requirement::ContextOptions;
use crate::core::requirement::GranularityRequirement;
use crate::core::requirement::RequirementKind;
use crate::core::requirement::RequirementValue;
use crate::core::requirement::TestCaseSpec;
use crate::core::testbed::TestBedConfig;

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves the ordered list of contexts a test case should run in.
///
/// A test with no declared granularity requirement is treated as `Any`. The
/// returned list may be empty; the caller must treat that as "this test
/// cannot run in this environment", distinct from a setup failure.
#[must_use]
pub fn resolve_contexts(config: &TestBedConfig, tc: &TestCaseSpec) -> Vec<GranularityContext> {
    let default_options = ContextOptions::default();
    let (requirement, options) = tc.requirement(RequirementKind::Granularity).map_or(
        (&GranularityRequirement::Any, &default_options),
        |declared| {
            let RequirementValue::Granularity(requirement) = &declared.value;
            (requirement, &declared.options)
        },
    );

    // The no-filesystem sentinel bypasses availability entirely: the test
    // asserts it touches no filesystem, so configuration is irrelevant.
    if *requirement == GranularityRequirement::NoFilesystem {
        return vec![GranularityContext::None(NoFsContext::new())];
    }

    let available = config.available();
    let mut candidates: Vec<Granularity> = match requirement {
        GranularityRequirement::CacheLineOrLess => [Granularity::Byte, Granularity::CacheLine]
            .into_iter()
            .filter(|kind| available.contains(kind))
            .collect(),
        GranularityRequirement::PageOrLess => {
            Granularity::ALL.into_iter().filter(|kind| available.contains(kind)).collect()
        }
        GranularityRequirement::Any => available.first().copied().into_iter().collect(),
        GranularityRequirement::Exact(kinds) => {
            kinds.iter().copied().filter(|kind| available.contains(kind)).collect()
        }
        GranularityRequirement::NoFilesystem => Vec::new(),
    };

    // Or-less narrowing keys off the declared requirement, not the branch
    // that computed the candidate list: the test asked for "this kind or
    // cheaper", so the single smallest available kind suffices.
    let or_less = matches!(
        requirement,
        GranularityRequirement::CacheLineOrLess | GranularityRequirement::PageOrLess
    );
    if or_less && candidates.len() > 1 {
        candidates.sort_unstable();
        candidates.truncate(1);
    }

    let mut contexts = Vec::with_capacity(candidates.len());
    for kind in candidates {
        match FsContext::new(config, kind, tc.dir_tag(), options) {
            Ok(ctx) => contexts.push(GranularityContext::Fs(ctx)),
            Err(skip) => {
                tracing::debug!(
                    test_case = %tc.name(),
                    granularity = %kind,
                    reason = %skip,
                    "skipping granularity candidate"
                );
            }
        }
    }
    contexts
}

// ============================================================================
// SECTION: Tests
// ============================================================================
