//! Exercise store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the save/load API over `exercises` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `save_exercise` persists the exercise row and its selected labels in
//!   one transaction; a failed save leaves no partial entry behind.
//! - Only selected labels are stored; the full tag sequence is rebuilt
//!   from the canonical catalog on read.
//! - A persisted label outside the canonical catalog is surfaced as
//!   `InvalidData`, never silently dropped.

use crate::db::DbError;
use crate::model::distortions::{is_canonical, CANONICAL_DISTORTIONS};
use crate::model::exercise::{DistortionTag, ExerciseId, ExerciseRecord};
use rusqlite::{params, Connection, Row};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const EXERCISE_SELECT_SQL: &str = "SELECT
    uuid,
    automatic_thought,
    challenge,
    alternative_thought,
    created_at
FROM exercises";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for exercise persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted exercise data: {message}")
            }
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract consumed by the exercise form.
///
/// `save_exercise` takes the four draft fields in their fixed order and
/// durably records one exercise entry. `latest_exercise` returns the most
/// recently created entry, if any.
pub trait ExerciseStore {
    fn save_exercise(
        &self,
        automatic_thought: &str,
        cognitive_distortions: &[DistortionTag],
        challenge: &str,
        alternative_thought: &str,
    ) -> RepoResult<ExerciseId>;

    fn latest_exercise(&self) -> RepoResult<Option<ExerciseRecord>>;
}

/// SQLite-backed exercise store.
#[derive(Debug)]
pub struct SqliteExerciseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteExerciseRepository<'conn> {
    /// Wraps a bootstrapped connection after verifying the schema is ready.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ExerciseStore for SqliteExerciseRepository<'_> {
    fn save_exercise(
        &self,
        automatic_thought: &str,
        cognitive_distortions: &[DistortionTag],
        challenge: &str,
        alternative_thought: &str,
    ) -> RepoResult<ExerciseId> {
        validate_tag_sequence(cognitive_distortions)?;

        let id = Uuid::new_v4();
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO exercises (
                uuid,
                automatic_thought,
                challenge,
                alternative_thought
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                id.to_string(),
                automatic_thought,
                challenge,
                alternative_thought,
            ],
        )?;

        for tag in cognitive_distortions.iter().filter(|tag| tag.selected) {
            tx.execute(
                "INSERT INTO exercise_distortions (exercise_uuid, label)
                 VALUES (?1, ?2);",
                params![id.to_string(), tag.label.as_str()],
            )?;
        }

        tx.commit()?;
        Ok(id)
    }

    fn latest_exercise(&self) -> RepoResult<Option<ExerciseRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EXERCISE_SELECT_SQL}
             ORDER BY created_at DESC, uuid ASC
             LIMIT 1;"
        ))?;

        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            let record = parse_exercise_row(self.conn, row)?;
            return Ok(Some(record));
        }

        Ok(None)
    }
}

fn parse_exercise_row(conn: &Connection, row: &Row<'_>) -> RepoResult<ExerciseRecord> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in exercises.uuid"))
    })?;

    let selected = load_selected_labels(conn, &uuid_text)?;

    Ok(ExerciseRecord {
        uuid,
        automatic_thought: row.get("automatic_thought")?,
        cognitive_distortions: CANONICAL_DISTORTIONS
            .iter()
            .map(|label| DistortionTag {
                label: (*label).to_string(),
                selected: selected.contains(*label),
            })
            .collect(),
        challenge: row.get("challenge")?,
        alternative_thought: row.get("alternative_thought")?,
        created_at: row.get("created_at")?,
    })
}

fn load_selected_labels(conn: &Connection, exercise_uuid: &str) -> RepoResult<HashSet<String>> {
    let mut stmt = conn.prepare(
        "SELECT label
         FROM exercise_distortions
         WHERE exercise_uuid = ?1;",
    )?;

    let mut rows = stmt.query([exercise_uuid])?;
    let mut labels = HashSet::new();

    while let Some(row) = rows.next()? {
        let label: String = row.get(0)?;
        if !is_canonical(&label) {
            return Err(RepoError::InvalidData(format!(
                "unknown distortion label `{label}` in exercise_distortions.label"
            )));
        }
        labels.insert(label);
    }

    Ok(labels)
}

/// Rejects tag sequences that break the canonical-catalog invariant:
/// exactly one entry per canonical label, in canonical order.
fn validate_tag_sequence(tags: &[DistortionTag]) -> RepoResult<()> {
    if tags.len() != CANONICAL_DISTORTIONS.len() {
        return Err(RepoError::InvalidData(format!(
            "expected {} distortion tags, got {}",
            CANONICAL_DISTORTIONS.len(),
            tags.len()
        )));
    }

    for (tag, expected) in tags.iter().zip(CANONICAL_DISTORTIONS) {
        if tag.label != *expected {
            return Err(RepoError::InvalidData(format!(
                "distortion tag `{}` out of place; expected `{expected}`",
                tag.label
            )));
        }
    }

    Ok(())
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    for table in ["exercises", "exercise_distortions"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in ["uuid", "automatic_thought", "challenge", "alternative_thought"] {
        if !table_has_column(conn, "exercises", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "exercises",
                column,
            });
        }
    }

    for column in ["exercise_uuid", "label"] {
        if !table_has_column(conn, "exercise_distortions", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "exercise_distortions",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
