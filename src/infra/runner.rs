//! Stage runners
//!
//! [`run_configure`] drives CMake, [`run_build`] drives `make install`.
//! Each owns exactly one child process and reports a [`StageOutcome`].
//! CMake's stdout and stderr share one pipe, so its diagnostics appear in the
//! order it wrote them. Make's streams are read separately and multiplexed.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::Path;
use tokio::process::Command;

use crate::config::defaults::{
    BUILD_TYPE_VAR, CMAKE_GENERATOR, INSTALL_PREFIX_VAR, INSTALL_TARGET,
};
use crate::core::console::PassThrough;
use crate::core::progress::ProgressMultiplexer;
use crate::core::sequencer::StageRunner;
use crate::core::stage::{BuildConfiguration, StageOutcome};

use super::process::{run_tool, Capture};
use super::tools::ToolPaths;

/// Build the CMake invocation for `config`
pub fn configure_command(cmake: &Path, config: &BuildConfiguration) -> Command {
    let mut install_prefix = OsString::from(format!("{INSTALL_PREFIX_VAR}="));
    install_prefix.push(&config.install_dir);

    let mut cmd = Command::new(cmake);
    cmd.arg(&config.source_dir)
        .args(["-G", CMAKE_GENERATOR])
        .arg("-D")
        .arg(install_prefix)
        .arg("-D")
        .arg(format!("{BUILD_TYPE_VAR}={}", config.build_mode))
        .current_dir(&config.working_dir);
    cmd
}

/// Build the `make -j N install` invocation
pub fn build_command(make: &Path, working_dir: &Path, jobs: usize) -> Command {
    let mut cmd = Command::new(make);
    cmd.arg("-j")
        .arg(jobs.to_string())
        .arg(INSTALL_TARGET)
        .current_dir(working_dir);
    cmd
}

/// Configure a project, echoing CMake's output to stdout
pub async fn run_configure(cmake: &Path, config: &BuildConfiguration) -> StageOutcome {
    run_configure_to(cmake, config, io::stdout()).await
}

/// Configure a project, echoing CMake's output to `out`
pub async fn run_configure_to<W: Write>(
    cmake: &Path,
    config: &BuildConfiguration,
    out: W,
) -> StageOutcome {
    tracing::info!(
        "Configuring {} in {} ({})",
        config.source_dir.display(),
        config.working_dir.display(),
        config.build_mode
    );
    let mut sink = PassThrough::new(out);
    run_tool(&mut configure_command(cmake, config), Capture::Merged, &mut sink).await
}

/// Build and install, rendering make's progress on stdout
pub async fn run_build(make: &Path, working_dir: &Path, jobs: usize) -> StageOutcome {
    run_build_to(make, working_dir, jobs, io::stdout()).await
}

/// Build and install, rendering make's progress on `out`
pub async fn run_build_to<W: Write>(
    make: &Path,
    working_dir: &Path,
    jobs: usize,
    out: W,
) -> StageOutcome {
    tracing::info!("Building in {} with {jobs} jobs", working_dir.display());
    let mut sink = ProgressMultiplexer::new(out);
    let mut cmd = build_command(make, working_dir, jobs);
    run_tool(&mut cmd, Capture::Separate, &mut sink).await
}

/// Runs stages with real CMake and Make processes
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    tools: ToolPaths,
}

impl ProcessRunner {
    pub fn new(tools: ToolPaths) -> Self {
        Self { tools }
    }
}

impl StageRunner for ProcessRunner {
    async fn configure(&mut self, config: &BuildConfiguration) -> StageOutcome {
        run_configure(&self.tools.cmake, config).await
    }

    async fn build(&mut self, working_dir: &Path, jobs: usize) -> StageOutcome {
        run_build(&self.tools.make, working_dir, jobs).await
    }
}
