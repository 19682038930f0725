//! # dockrs Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by the archiver, the engine helpers and the
//! command handlers:
//! - `config`: configuration loading, merging, and validation
//! - `error`: the `ContextError` / `DockrsError` types and the `Result` alias
//!
//! ```rust,ignore
//! use dockrs::core::config; // For loading configuration
//! use dockrs::core::error::{ContextError, DockrsError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
