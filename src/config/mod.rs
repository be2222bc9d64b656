//! Configuration and constants
//!
//! The orchestration core never reads the environment; everything the CLI
//! resolves is passed down explicitly.

pub mod defaults;
