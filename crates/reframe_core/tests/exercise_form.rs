use reframe_core::{
    DistortionTag, DraftError, DraftField, ExerciseDraft, ExerciseForm, ExerciseId,
    ExerciseRecord, ExerciseStore, RepoError, RepoResult, CANONICAL_DISTORTIONS,
};
use std::cell::RefCell;
use uuid::Uuid;

/// One recorded `save_exercise` call, fields in gateway order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SavedCall {
    automatic_thought: String,
    cognitive_distortions: Vec<DistortionTag>,
    challenge: String,
    alternative_thought: String,
}

/// Store double that records calls and can be switched to fail.
#[derive(Default)]
struct RecordingStore {
    calls: RefCell<Vec<SavedCall>>,
    fail_saves: bool,
    latest: Option<ExerciseRecord>,
}

impl ExerciseStore for RecordingStore {
    fn save_exercise(
        &self,
        automatic_thought: &str,
        cognitive_distortions: &[DistortionTag],
        challenge: &str,
        alternative_thought: &str,
    ) -> RepoResult<ExerciseId> {
        if self.fail_saves {
            return Err(RepoError::InvalidData("store rejected the entry".to_string()));
        }
        self.calls.borrow_mut().push(SavedCall {
            automatic_thought: automatic_thought.to_string(),
            cognitive_distortions: cognitive_distortions.to_vec(),
            challenge: challenge.to_string(),
            alternative_thought: alternative_thought.to_string(),
        });
        Ok(Uuid::new_v4())
    }

    fn latest_exercise(&self) -> RepoResult<Option<ExerciseRecord>> {
        Ok(self.latest.clone())
    }
}

#[test]
fn full_session_hands_store_exact_fields_and_resets_draft() {
    let store = RecordingStore::default();
    let mut form = ExerciseForm::new();

    form.set_field(DraftField::AutomaticThought, "I will fail");
    form.toggle_distortion("Catastrophizing").unwrap();
    form.set_field(DraftField::Challenge, "No evidence for this");
    form.set_field(
        DraftField::AlternativeThought,
        "I might struggle but can adapt",
    );

    form.save(&store).unwrap();

    let calls = store.calls.borrow();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.automatic_thought, "I will fail");
    assert_eq!(call.challenge, "No evidence for this");
    assert_eq!(call.alternative_thought, "I might struggle but can adapt");
    for tag in &call.cognitive_distortions {
        assert_eq!(tag.selected, tag.label == "Catastrophizing");
    }

    assert_eq!(*form.draft(), ExerciseDraft::new());
}

#[test]
fn save_resets_draft_regardless_of_prior_contents() {
    let store = RecordingStore::default();
    let mut form = ExerciseForm::new();

    for label in CANONICAL_DISTORTIONS {
        form.toggle_distortion(label).unwrap();
    }
    form.set_field(DraftField::AutomaticThought, "everything is wrong");

    form.save(&store).unwrap();
    assert_eq!(*form.draft(), ExerciseDraft::new());
}

#[test]
fn empty_draft_saves_as_is() {
    let store = RecordingStore::default();
    let mut form = ExerciseForm::new();

    form.save(&store).unwrap();

    let calls = store.calls.borrow();
    assert_eq!(calls[0].automatic_thought, "");
    assert_eq!(calls[0].challenge, "");
    assert_eq!(calls[0].alternative_thought, "");
    assert!(calls[0].cognitive_distortions.iter().all(|tag| !tag.selected));
}

#[test]
fn failed_save_surfaces_error_and_keeps_draft() {
    let store = RecordingStore {
        fail_saves: true,
        ..RecordingStore::default()
    };
    let mut form = ExerciseForm::new();

    form.set_field(DraftField::AutomaticThought, "unsaved text");
    form.toggle_distortion("Labeling").unwrap();
    let before = form.draft().clone();
    let revision_before = form.revision();

    let err = form.save(&store).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));

    assert_eq!(*form.draft(), before);
    assert_eq!(form.revision(), revision_before);
    assert!(store.calls.borrow().is_empty());
}

#[test]
fn every_mutation_bumps_revision_and_misses_do_not() {
    let mut form = ExerciseForm::new();
    assert_eq!(form.revision(), 0);

    form.set_field(DraftField::Challenge, "a");
    assert_eq!(form.revision(), 1);

    form.toggle_distortion("Mental Filter").unwrap();
    assert_eq!(form.revision(), 2);

    let err = form.toggle_distortion("NotARealLabel").unwrap_err();
    assert!(matches!(err, DraftError::UnknownDistortion { .. }));
    assert_eq!(form.revision(), 2);
}

#[test]
fn load_last_returns_record_without_touching_draft() {
    let stored = ExerciseRecord {
        uuid: Uuid::new_v4(),
        automatic_thought: "old thought".to_string(),
        cognitive_distortions: ExerciseDraft::new().cognitive_distortions,
        challenge: "old challenge".to_string(),
        alternative_thought: "old alternative".to_string(),
        created_at: 1_700_000_000_000,
    };
    let store = RecordingStore {
        latest: Some(stored.clone()),
        ..RecordingStore::default()
    };

    let mut form = ExerciseForm::new();
    form.set_field(DraftField::AutomaticThought, "in progress");
    let before = form.draft().clone();

    let loaded = form.load_last(&store).unwrap();
    assert_eq!(loaded, Some(stored));
    assert_eq!(*form.draft(), before);
}

#[test]
fn load_last_on_empty_store_returns_none() {
    let store = RecordingStore::default();
    let form = ExerciseForm::new();
    assert_eq!(form.load_last(&store).unwrap(), None);
}
