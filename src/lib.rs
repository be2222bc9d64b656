//! bfbuild - Build orchestrator for the BrainFuck compiler
//!
//! Drives CMake and Make for the vendored LLVM libraries and then for the
//! compiler itself, turning their interleaved output into a single progress
//! stream.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Stage sequencing, job estimation and progress rendering
//! - [`infra`] - Infrastructure layer (child processes, filesystem, host introspection)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
