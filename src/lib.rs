//! Purpose: Library crate behind the `ipm-keyfile` converter CLI and its tests.
//! Exports: `core` (records, parsing, serialization, config, errors), `convert`, `notice`.
//! Role: Keeps parsing and encoding testable without spawning the binary.
//! Invariants: Core modules take explicit paths and policies; no hidden global state.
pub mod convert;
pub mod core;
pub mod notice;
