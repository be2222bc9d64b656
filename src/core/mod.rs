//! Core orchestration logic
//!
//! Process spawning and filesystem access go through [`crate::infra`];
//! the types here decide what runs, in which order, and how its output is
//! shown.
//!
//! # Submodules
//!
//! - [`stage`] - Projects, build modes and stage outcomes
//! - [`parallelism`] - Job count estimation from CPU affinity
//! - [`console`] - Line sinks for child process output
//! - [`progress`] - In-place rendering of make progress markers
//! - [`sequencer`] - Ordering of the LLVM and compiler stages

pub mod console;
pub mod parallelism;
pub mod progress;
pub mod sequencer;
pub mod stage;
