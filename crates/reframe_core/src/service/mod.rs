//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate draft mutations and store calls into the form lifecycle.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod exercise_form;
