//! Infrastructure layer
//!
//! Handles child processes, the filesystem and host introspection.
//! Everything that spawns or touches disk goes through here.

pub mod filesystem;
pub mod host;
pub mod process;
pub mod runner;
pub mod tools;
