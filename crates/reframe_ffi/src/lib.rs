//! FFI crate exposing Reframe core to the Flutter UI layer.

pub mod api;
