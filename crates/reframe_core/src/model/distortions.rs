//! Canonical cognitive-distortion catalog.
//!
//! # Responsibility
//! - Define the closed, ordered set of valid distortion labels.
//!
//! # Invariants
//! - The list is immutable configuration data; order is display order.
//! - Labels are unique within the list.

/// The closed set of distortion labels, in display order.
///
/// Every `ExerciseDraft` carries exactly one selectable tag per entry of
/// this list. Adding or renaming a label is a schema-level change, not a
/// runtime operation.
pub const CANONICAL_DISTORTIONS: &[&str] = &[
    "All-or-Nothing Thinking",
    "Overgeneralization",
    "Mental Filter",
    "Disqualifying the Positive",
    "Mind Reading",
    "Fortune Telling",
    "Catastrophizing",
    "Minimization",
    "Emotional Reasoning",
    "Should Statements",
    "Labeling",
    "Personalization",
];

/// Returns whether `label` is part of the canonical catalog (exact match).
pub fn is_canonical(label: &str) -> bool {
    CANONICAL_DISTORTIONS.contains(&label)
}

#[cfg(test)]
mod tests {
    use super::{is_canonical, CANONICAL_DISTORTIONS};
    use std::collections::HashSet;

    #[test]
    fn catalog_labels_are_unique_and_non_empty() {
        let unique: HashSet<_> = CANONICAL_DISTORTIONS.iter().collect();
        assert_eq!(unique.len(), CANONICAL_DISTORTIONS.len());
        assert!(CANONICAL_DISTORTIONS.iter().all(|label| !label.is_empty()));
    }

    #[test]
    fn is_canonical_is_exact_match() {
        assert!(is_canonical("Catastrophizing"));
        assert!(!is_canonical("catastrophizing"));
        assert!(!is_canonical("NotARealLabel"));
    }
}
