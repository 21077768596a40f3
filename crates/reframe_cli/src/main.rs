//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `reframe_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Tiny probe to validate core crate wiring independently from the
    // Flutter/FFI runtime setup.
    println!("reframe_core ping={}", reframe_core::ping());
    println!("reframe_core version={}", reframe_core::core_version());
}
