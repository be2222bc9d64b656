//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no orchestration logic - that belongs in the [`crate::core`] module.

pub mod output;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::config::defaults::{DEFAULT_CMAKE, DEFAULT_MAKE};
use crate::core::parallelism::estimate_job_count;
use crate::core::sequencer::{Layout, SequenceOptions, Sequencer};
use crate::core::stage::BuildMode;
use crate::infra::host::HostTopology;
use crate::infra::runner::ProcessRunner;
use crate::infra::tools::ToolPaths;

/// Build the BrainFuck compiler
///
/// Builds the vendored LLVM libraries when they are missing, then the
/// compiler itself. Defaults to building in release mode.
#[derive(Parser, Debug)]
#[command(name = "bfbuild")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("build_type").args(["debug", "release"])))]
pub struct Cli {
    /// Build in debug mode
    #[arg(short, long)]
    pub debug: bool,

    /// Build in release mode
    #[arg(short, long)]
    pub release: bool,

    /// Build the llvm libraries even if they are already installed
    #[arg(long = "build-llvm")]
    pub build_llvm: bool,

    /// Number of parallel make jobs (estimated from CPU affinity by default)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,

    /// Repository root
    #[arg(long, env = "BFBUILD_REPO_DIR", default_value = ".")]
    pub repo_dir: PathBuf,

    /// CMake executable
    #[arg(long, env = "BFBUILD_CMAKE", default_value = DEFAULT_CMAKE)]
    pub cmake: PathBuf,

    /// Make executable
    #[arg(long, env = "BFBUILD_MAKE", default_value = DEFAULT_MAKE)]
    pub make: PathBuf,

    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress banners (tool output is still shown)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Build type selected on the command line
    pub fn build_mode(&self) -> BuildMode {
        if self.debug {
            BuildMode::Debug
        } else {
            BuildMode::Release
        }
    }

    /// Parallel jobs, either requested or estimated from the host
    pub fn job_count(&self) -> usize {
        self.jobs
            .map_or_else(|| estimate_job_count(&HostTopology), usize::from)
    }

    /// Execute the build
    pub async fn run(self) -> Result<()> {
        let tools = ToolPaths::resolve(&self.cmake, &self.make)?;
        let repo_dir = self
            .repo_dir
            .canonicalize()
            .with_context(|| format!("Repository not found: {}", self.repo_dir.display()))?;

        let options = SequenceOptions {
            build_mode: self.build_mode(),
            rebuild_llvm: self.build_llvm,
            jobs: self.job_count(),
            quiet: self.quiet,
        };
        tracing::info!(
            "Building {} in {} mode with {} jobs",
            repo_dir.display(),
            options.build_mode,
            options.jobs
        );

        let layout = Layout::new(&repo_dir);
        let mut sequencer = Sequencer::new(layout, options, ProcessRunner::new(tools));
        sequencer.run().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_release() {
        let cli = Cli::try_parse_from(["bfbuild"]).unwrap();
        assert_eq!(cli.build_mode(), BuildMode::Release);
        assert!(!cli.build_llvm);
    }

    #[test]
    fn test_debug_flag() {
        let cli = Cli::try_parse_from(["bfbuild", "-d"]).unwrap();
        assert_eq!(cli.build_mode(), BuildMode::Debug);
    }

    #[test]
    fn test_debug_and_release_conflict() {
        assert!(Cli::try_parse_from(["bfbuild", "--debug", "--release"]).is_err());
    }

    #[test]
    fn test_jobs_override() {
        let cli = Cli::try_parse_from(["bfbuild", "-j", "7", "--build-llvm"]).unwrap();
        assert_eq!(cli.job_count(), 7);
        assert!(cli.build_llvm);
    }

    #[test]
    fn test_zero_jobs_rejected() {
        assert!(Cli::try_parse_from(["bfbuild", "--jobs", "0"]).is_err());
    }

    #[test]
    fn test_estimated_jobs_exceed_cpu_count() {
        let cli = Cli::try_parse_from(["bfbuild"]).unwrap();
        assert!(cli.job_count() >= 2);
    }
}
