//! Output formatting
//!
//! Diagnostics printed by the binary itself. Tool output is streamed by
//! [`crate::infra::runner`].

/// Status message prefixes
pub mod status {
    /// Error prefix (red X)
    pub const ERROR: &str = "✗";
}

/// Format the one-line diagnostic for a failed run
pub fn format_error(error: &anyhow::Error) -> String {
    format!("{} {error:#}", status::ERROR)
}

/// Print the diagnostic for a failed run to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{}", format_error(error));
}
