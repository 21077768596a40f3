//! Exercise draft and record shapes.
//!
//! # Responsibility
//! - Define the in-progress draft owned by the form controller.
//! - Define the persisted exercise record returned by storage.
//! - Provide draft mutation helpers with a closed-catalog guarantee.
//!
//! # Invariants
//! - `cognitive_distortions` holds exactly one tag per canonical label,
//!   in canonical order; labels never change after construction.
//! - Toggling rebuilds the tag sequence instead of mutating shared storage
//!   in place.

use crate::model::distortions::CANONICAL_DISTORTIONS;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a persisted exercise entry.
pub type ExerciseId = Uuid;

/// One selectable distortion entry in a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistortionTag {
    /// Canonical distortion name; immutable after construction.
    pub label: String,
    /// Whether the user has tagged this distortion on the current thought.
    pub selected: bool,
}

/// The three free-text fields of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    AutomaticThought,
    Challenge,
    AlternativeThought,
}

impl DraftField {
    /// Stable wire/diagnostic name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AutomaticThought => "automatic_thought",
            Self::Challenge => "challenge",
            Self::AlternativeThought => "alternative_thought",
        }
    }

    /// Parses a wire name back into a field.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "automatic_thought" => Some(Self::AutomaticThought),
            "challenge" => Some(Self::Challenge),
            "alternative_thought" => Some(Self::AlternativeThought),
            _ => None,
        }
    }

    /// Field that receives focus after submitting this one.
    ///
    /// Kept in core so the UI layer does not hard-code the entry order.
    /// There is no focus target after the alternative thought.
    pub fn next_focus(self) -> Option<Self> {
        match self {
            Self::AutomaticThought => Some(Self::Challenge),
            Self::Challenge => Some(Self::AlternativeThought),
            Self::AlternativeThought => None,
        }
    }
}

impl Display for DraftField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a draft operation references an unknown label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// The label is not part of the canonical distortion catalog.
    UnknownDistortion { label: String },
}

impl Display for DraftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownDistortion { label } => {
                write!(f, "unknown cognitive distortion label: `{label}`")
            }
        }
    }
}

impl Error for DraftError {}

/// In-progress exercise, owned exclusively by the form controller.
///
/// Lifetime is one editing session: created at default on construction,
/// mutated field-by-field, and replaced by a fresh default after every
/// successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDraft {
    pub automatic_thought: String,
    pub cognitive_distortions: Vec<DistortionTag>,
    pub challenge: String,
    pub alternative_thought: String,
}

impl ExerciseDraft {
    /// Creates the default draft: empty text fields and one unselected tag
    /// per canonical label, in canonical order.
    pub fn new() -> Self {
        Self {
            automatic_thought: String::new(),
            cognitive_distortions: CANONICAL_DISTORTIONS
                .iter()
                .map(|label| DistortionTag {
                    label: (*label).to_string(),
                    selected: false,
                })
                .collect(),
            challenge: String::new(),
            alternative_thought: String::new(),
        }
    }

    /// Replaces one free-text field. No trimming, no length limit.
    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::AutomaticThought => self.automatic_thought = value,
            DraftField::Challenge => self.challenge = value,
            DraftField::AlternativeThought => self.alternative_thought = value,
        }
    }

    /// Flips the `selected` flag of the tag whose label matches exactly.
    ///
    /// The sequence is rebuilt with the target entry flipped and all others
    /// copied unchanged. An unknown label returns
    /// `DraftError::UnknownDistortion` and leaves every tag untouched.
    pub fn toggle_distortion(&mut self, label: &str) -> Result<(), DraftError> {
        if !self
            .cognitive_distortions
            .iter()
            .any(|tag| tag.label == label)
        {
            return Err(DraftError::UnknownDistortion {
                label: label.to_string(),
            });
        }

        self.cognitive_distortions = self
            .cognitive_distortions
            .iter()
            .map(|tag| DistortionTag {
                label: tag.label.clone(),
                selected: if tag.label == label {
                    !tag.selected
                } else {
                    tag.selected
                },
            })
            .collect();

        Ok(())
    }

    /// Labels currently tagged on the draft, in canonical order.
    pub fn selected_labels(&self) -> Vec<&str> {
        self.cognitive_distortions
            .iter()
            .filter(|tag| tag.selected)
            .map(|tag| tag.label.as_str())
            .collect()
    }
}

impl Default for ExerciseDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// Persisted exercise entry as returned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    /// Stable global ID assigned at save time.
    pub uuid: ExerciseId,
    pub automatic_thought: String,
    /// Full canonical tag sequence with persisted selections applied.
    pub cognitive_distortions: Vec<DistortionTag>,
    pub challenge: String,
    pub alternative_thought: String,
    /// Unix epoch milliseconds at save time.
    pub created_at: i64,
}
