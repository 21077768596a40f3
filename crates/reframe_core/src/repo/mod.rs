//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the exercise persistence contract consumed by the form.
//! - Isolate SQLite query details from form orchestration.
//!
//! # Invariants
//! - Write paths enforce the canonical-tag invariant before persistence.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod exercise_repo;
