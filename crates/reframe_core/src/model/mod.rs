//! Domain model for the thought-record exercise.
//!
//! # Responsibility
//! - Define the canonical draft and persisted-record shapes.
//! - Own the canonical cognitive-distortion label list.
//!
//! # Invariants
//! - A draft always carries exactly one tag per canonical label, in
//!   canonical order, with labels immutable after construction.
//! - Every persisted exercise is identified by a stable `ExerciseId`.

pub mod distortions;
pub mod exercise;
