//! Exercise form controller.
//!
//! # Responsibility
//! - Own the in-progress `ExerciseDraft` and apply user edits.
//! - Drive the save/reset lifecycle against an `ExerciseStore`.
//!
//! # Invariants
//! - The draft is reset to its default shape only after a successful save;
//!   a failed save leaves the user's text untouched.
//! - Every mutation bumps `revision`, the presentation layer's signal to
//!   re-render.
//! - The controller never bypasses store validation/persistence contracts.

use crate::model::exercise::{DraftError, DraftField, ExerciseDraft, ExerciseId, ExerciseRecord};
use crate::repo::exercise_repo::{ExerciseStore, RepoResult};
use log::{error, info};

/// Form state controller for one thought-record editing session.
///
/// The store is passed per call rather than held: SQLite store instances
/// borrow their connection, while the form outlives any single connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseForm {
    draft: ExerciseDraft,
    revision: u64,
}

impl ExerciseForm {
    /// Creates a controller with the default draft.
    pub fn new() -> Self {
        Self {
            draft: ExerciseDraft::new(),
            revision: 0,
        }
    }

    /// Read access to the current draft.
    pub fn draft(&self) -> &ExerciseDraft {
        &self.draft
    }

    /// Monotonic change counter; bumps on every draft mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replaces one free-text field of the draft.
    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft.set_field(field, value);
        self.revision += 1;
    }

    /// Flips one distortion tag by exact label match.
    ///
    /// An unknown label fails with `DraftError::UnknownDistortion` and
    /// leaves the draft (and revision) unchanged.
    pub fn toggle_distortion(&mut self, label: &str) -> Result<(), DraftError> {
        self.draft.toggle_distortion(label)?;
        self.revision += 1;
        Ok(())
    }

    /// Persists the draft through the store and resets it on success.
    ///
    /// The four fields are handed to the store in their fixed order. On
    /// failure the error is returned unchanged and the draft keeps its
    /// current contents.
    pub fn save<S: ExerciseStore>(&mut self, store: &S) -> RepoResult<ExerciseId> {
        let result = store.save_exercise(
            &self.draft.automatic_thought,
            &self.draft.cognitive_distortions,
            &self.draft.challenge,
            &self.draft.alternative_thought,
        );

        match result {
            Ok(id) => {
                info!(
                    "event=exercise_save module=form status=ok exercise_id={id} thought_chars={} challenge_chars={} alternative_chars={} selected_distortions={}",
                    self.draft.automatic_thought.chars().count(),
                    self.draft.challenge.chars().count(),
                    self.draft.alternative_thought.chars().count(),
                    self.draft.selected_labels().len()
                );
                self.draft = ExerciseDraft::new();
                self.revision += 1;
                Ok(id)
            }
            Err(err) => {
                error!("event=exercise_save module=form status=error error={err}");
                Err(err)
            }
        }
    }

    /// Fetches the most recent stored exercise, the mount-time load.
    ///
    /// The record is returned to the caller; the draft is deliberately not
    /// populated from it. A load failure is logged and surfaced without
    /// touching form state.
    pub fn load_last<S: ExerciseStore>(&self, store: &S) -> RepoResult<Option<ExerciseRecord>> {
        match store.latest_exercise() {
            Ok(record) => {
                info!(
                    "event=exercise_load module=form status=ok found={}",
                    record.is_some()
                );
                Ok(record)
            }
            Err(err) => {
                error!("event=exercise_load module=form status=error error={err}");
                Err(err)
            }
        }
    }
}

impl Default for ExerciseForm {
    fn default() -> Self {
        Self::new()
    }
}
