//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level form operations to Dart via FRB.
//! - Own the process-wide exercise form so the draft survives across calls.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - All draft access is funneled through the shared form controller.
//! - A failed save leaves the draft untouched.

use reframe_core::db::open_db;
use reframe_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    DraftField, ExerciseForm, SqliteExerciseRepository, CANONICAL_DISTORTIONS,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

const EXERCISE_DB_FILE_NAME: &str = "reframe_exercises.sqlite3";
static EXERCISE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static FORM: OnceLock<Mutex<ExerciseForm>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// The canonical distortion labels in display order.
///
/// # FFI contract
/// - Sync call, non-blocking, never throws.
/// - The UI renders the selector from this list; labels are stable.
#[flutter_rust_bridge::frb(sync)]
pub fn canonical_distortions() -> Vec<String> {
    CANONICAL_DISTORTIONS
        .iter()
        .map(|label| (*label).to_string())
        .collect()
}

/// One distortion option as shown by the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistortionOption {
    pub label: String,
    pub selected: bool,
}

/// Current draft contents plus a change counter for re-render decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub automatic_thought: String,
    pub cognitive_distortions: Vec<DistortionOption>,
    pub challenge: String,
    pub alternative_thought: String,
    /// Bumps on every draft mutation; equal snapshots share a revision.
    pub revision: u64,
}

/// Generic action response envelope for form commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Optional created exercise ID (save only).
    pub exercise_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
    /// Form revision after the call.
    pub revision: u64,
}

impl FormActionResponse {
    fn success(message: impl Into<String>, exercise_id: Option<String>, revision: u64) -> Self {
        Self {
            ok: true,
            exercise_id,
            message: message.into(),
            revision,
        }
    }

    fn failure(message: impl Into<String>, revision: u64) -> Self {
        Self {
            ok: false,
            exercise_id: None,
            message: message.into(),
            revision,
        }
    }
}

/// Stored exercise returned by the mount-time load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseLoadResponse {
    /// Whether a stored exercise exists.
    pub found: bool,
    pub exercise_id: Option<String>,
    pub automatic_thought: Option<String>,
    /// Selected labels of the stored exercise, in canonical order.
    pub selected_distortions: Vec<String>,
    pub challenge: Option<String>,
    pub alternative_thought: Option<String>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Returns the current draft and revision.
///
/// # FFI contract
/// - Sync call, non-blocking, never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn form_snapshot() -> FormSnapshot {
    let form = match lock_form() {
        Ok(form) => form,
        Err(message) => {
            log::error!("event=form_snapshot module=ffi status=error error={message}");
            return FormSnapshot {
                automatic_thought: String::new(),
                cognitive_distortions: Vec::new(),
                challenge: String::new(),
                alternative_thought: String::new(),
                revision: 0,
            };
        }
    };
    snapshot_of(&form)
}

/// Replaces one free-text field of the draft.
///
/// Input semantics:
/// - `field`: `automatic_thought|challenge|alternative_thought`.
/// - `value`: stored as-is, no trimming or length limit.
///
/// # FFI contract
/// - Sync call, never panics.
/// - Unknown field names return a failed envelope without draft changes.
#[flutter_rust_bridge::frb(sync)]
pub fn form_set_field(field: String, value: String) -> FormActionResponse {
    let Some(parsed) = DraftField::parse(field.as_str()) else {
        return FormActionResponse::failure(format!("unknown draft field: `{field}`"), 0);
    };

    match lock_form() {
        Ok(mut form) => {
            form.set_field(parsed, value);
            FormActionResponse::success("Field updated.", None, form.revision())
        }
        Err(message) => FormActionResponse::failure(message, 0),
    }
}

/// Toggles one distortion tag by exact label match.
///
/// # FFI contract
/// - Sync call, never panics.
/// - Unknown labels return a failed envelope; no tag is mutated.
#[flutter_rust_bridge::frb(sync)]
pub fn form_toggle_distortion(label: String) -> FormActionResponse {
    match lock_form() {
        Ok(mut form) => match form.toggle_distortion(label.as_str()) {
            Ok(()) => FormActionResponse::success("Distortion toggled.", None, form.revision()),
            Err(err) => FormActionResponse::failure(err.to_string(), form.revision()),
        },
        Err(message) => FormActionResponse::failure(message, 0),
    }
}

/// Saves the draft and resets it to defaults on success.
///
/// # FFI contract
/// - Sync call, DB-backed execution, never panics.
/// - On failure the draft keeps the user's text.
#[flutter_rust_bridge::frb(sync)]
pub fn form_save() -> FormActionResponse {
    let mut form = match lock_form() {
        Ok(form) => form,
        Err(message) => return FormActionResponse::failure(message, 0),
    };

    let db_path = resolve_exercise_db_path();
    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            return FormActionResponse::failure(
                format!("exercise DB open failed: {err}"),
                form.revision(),
            );
        }
    };

    let repo = match SqliteExerciseRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            return FormActionResponse::failure(
                format!("exercise store init failed: {err}"),
                form.revision(),
            );
        }
    };

    match form.save(&repo) {
        Ok(id) => {
            FormActionResponse::success("Exercise saved.", Some(id.to_string()), form.revision())
        }
        Err(err) => {
            FormActionResponse::failure(format!("form_save failed: {err}"), form.revision())
        }
    }
}

/// Fetches the most recent stored exercise (the mount-time load).
///
/// The draft is deliberately not populated from the result; the record is
/// handed back to the UI layer only.
///
/// # FFI contract
/// - Sync call, DB-backed execution, never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn form_load_last() -> ExerciseLoadResponse {
    let form = match lock_form() {
        Ok(form) => form,
        Err(message) => return load_failure(message),
    };

    let db_path = resolve_exercise_db_path();
    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => return load_failure(format!("exercise DB open failed: {err}")),
    };

    let repo = match SqliteExerciseRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => return load_failure(format!("exercise store init failed: {err}")),
    };

    match form.load_last(&repo) {
        Ok(Some(record)) => ExerciseLoadResponse {
            found: true,
            exercise_id: Some(record.uuid.to_string()),
            automatic_thought: Some(record.automatic_thought),
            selected_distortions: record
                .cognitive_distortions
                .iter()
                .filter(|tag| tag.selected)
                .map(|tag| tag.label.clone())
                .collect(),
            challenge: Some(record.challenge),
            alternative_thought: Some(record.alternative_thought),
            message: "Exercise loaded.".to_string(),
        },
        Ok(None) => ExerciseLoadResponse {
            found: false,
            exercise_id: None,
            automatic_thought: None,
            selected_distortions: Vec::new(),
            challenge: None,
            alternative_thought: None,
            message: "No stored exercise.".to_string(),
        },
        Err(err) => load_failure(format!("form_load_last failed: {err}")),
    }
}

fn load_failure(message: String) -> ExerciseLoadResponse {
    ExerciseLoadResponse {
        found: false,
        exercise_id: None,
        automatic_thought: None,
        selected_distortions: Vec::new(),
        challenge: None,
        alternative_thought: None,
        message,
    }
}

fn snapshot_of(form: &ExerciseForm) -> FormSnapshot {
    let draft = form.draft();
    FormSnapshot {
        automatic_thought: draft.automatic_thought.clone(),
        cognitive_distortions: draft
            .cognitive_distortions
            .iter()
            .map(|tag| DistortionOption {
                label: tag.label.clone(),
                selected: tag.selected,
            })
            .collect(),
        challenge: draft.challenge.clone(),
        alternative_thought: draft.alternative_thought.clone(),
        revision: form.revision(),
    }
}

fn lock_form() -> Result<MutexGuard<'static, ExerciseForm>, String> {
    FORM.get_or_init(|| Mutex::new(ExerciseForm::new()))
        .lock()
        .map_err(|_| "form state lock poisoned".to_string())
}

fn resolve_exercise_db_path() -> PathBuf {
    EXERCISE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("REFRAME_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(EXERCISE_DB_FILE_NAME)
        })
        .clone()
}
