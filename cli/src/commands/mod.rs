//! # dockrs Command Handlers (`commands`)
//!
//! File: cli/src/commands/mod.rs
//!
//! One module per top-level command group. Each group declares its own
//! subcommand modules and exposes an `Args` struct plus an async
//! `handle_*` dispatcher called from `main`.
//!

/// `dockrs container`: lifecycle of existing containers.
pub mod container;
/// `dockrs context`: pack and measure build contexts locally.
pub mod context;
/// `dockrs image`: build, list, tag and remove images on the engine.
pub mod image;
/// `dockrs system`: engine version and ping.
pub mod system;
