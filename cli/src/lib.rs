//! # dockrs
//!
//! File: cli/src/lib.rs
//!
//! Library half of the `dockrs` tool. The binary's command handlers are thin
//! layers over these modules; integration tests use them directly.
//!
//! - `core`: configuration and error types.
//! - `common::archive`: the build-context archiver.
//! - `common::docker`: the engine operations that consume it.
//!
pub mod common;
pub mod core;
