//! Domain grouping
//!
//! Buckets are kept in an [`IndexMap`] so that both the order in which
//! domains first appear and the order of features inside a bucket are stable.
//! Phase splitting depends on that order for deterministic output.

use indexmap::IndexMap;
use ppe_core::{Domain, FeatureClassification};

/// Insertion-ordered domain buckets
pub type DomainGroups = IndexMap<Domain, Vec<FeatureClassification>>;

/// Partition classifications into domain buckets
///
/// Own-phase features are dropped when their bucket already holds a
/// classification with the same suggested phase name, which collapses e.g. a
/// "User Login" feature and the implicit auth feature into one phase.
#[must_use]
pub fn group_by_domain(
    classifications: impl IntoIterator<Item = FeatureClassification>,
) -> DomainGroups {
    let mut groups = DomainGroups::new();

    for classification in classifications {
        let bucket = groups.entry(classification.domain).or_default();

        if classification.requires_own_phase
            && bucket.iter().any(|existing| {
                existing.suggested_phase_name == classification.suggested_phase_name
            })
        {
            tracing::debug!(
                feature = %classification.name,
                phase = %classification.suggested_phase_name,
                "dropping duplicate own-phase feature"
            );
            continue;
        }

        bucket.push(classification);
    }

    groups
}
