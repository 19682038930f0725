//! # dockrs Engine Interface (`common::docker`)
//!
//! File: cli/src/common/docker/mod.rs
//!
//! ## Overview
//!
//! Thin wrappers over `bollard` for the engine calls dockrs makes. The HTTP
//! transport and JSON models belong to `bollard`; this module only maps
//! configuration in and errors out.
//!
//! - **`connect`**: client construction from `EngineConfig`.
//! - **`system`**: `engine_version` and `ping`.
//! - **`images`**: `list_images`, `tag_image`, `remove_image`.
//! - **`containers`**: listing and lifecycle of existing containers.
//! - **`operations`**: `build_image`, which uploads an archived build context.
//!
//! Each call opens its own client.
//!
pub mod connect;
pub mod containers;
pub mod images;
pub mod operations;
pub mod system;

pub use connect::connect_docker;
pub use containers::{
    kill_container, list_containers, remove_container, rename_container, restart_container,
    start_container, stop_container, wait_container, WaitCondition,
};
pub use images::{list_images, remove_image, tag_image};
pub use operations::build_image;
pub use system::{engine_version, ping, EngineVersion};
