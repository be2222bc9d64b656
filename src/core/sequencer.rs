//! Stage sequencing
//!
//! Builds LLVM (when needed) and then the compiler, stopping at the first
//! failed stage.

use std::path::{Path, PathBuf};

use crate::config::defaults::{
    BIN_SUBDIR, BUILD_DIR, CMAKE_SUBDIR, LLVM_INSTALL_SUBDIR, LLVM_SOURCE_DIR,
};
use crate::error::StageError;
use crate::infra::filesystem;

use super::stage::{BuildConfiguration, BuildMode, Project, Stage, StageOutcome, StageState};

/// Runs the two halves of a stage
#[allow(async_fn_in_trait)]
pub trait StageRunner {
    /// Run the configuration tool
    async fn configure(&mut self, config: &BuildConfiguration) -> StageOutcome;

    /// Run the parallel build tool with `jobs` workers
    async fn build(&mut self, working_dir: &Path, jobs: usize) -> StageOutcome;
}

/// Directory layout of the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Repository root, holding the compiler's `CMakeLists.txt`
    pub repo_dir: PathBuf,
    /// Compiler build root, also its install prefix
    pub build_dir: PathBuf,
    /// Compiler configuration directory
    pub cmake_dir: PathBuf,
    /// Compiler output directory
    pub bin_dir: PathBuf,
    /// LLVM source tree
    pub llvm_source_dir: PathBuf,
    /// LLVM build tree
    pub llvm_build_dir: PathBuf,
    /// LLVM install prefix
    pub llvm_install_dir: PathBuf,
}

impl Layout {
    pub fn new(repo_dir: &Path) -> Self {
        let build_dir = repo_dir.join(BUILD_DIR);
        let llvm_source_dir = repo_dir.join(LLVM_SOURCE_DIR);
        let llvm_build_dir = llvm_source_dir.join(BUILD_DIR);

        Self {
            repo_dir: repo_dir.to_path_buf(),
            cmake_dir: build_dir.join(CMAKE_SUBDIR),
            bin_dir: build_dir.join(BIN_SUBDIR),
            build_dir,
            llvm_install_dir: llvm_build_dir.join(LLVM_INSTALL_SUBDIR),
            llvm_build_dir,
            llvm_source_dir,
        }
    }

    /// CMake inputs for the LLVM stage
    pub fn llvm_configuration(&self, build_mode: BuildMode) -> BuildConfiguration {
        BuildConfiguration {
            source_dir: self.llvm_source_dir.clone(),
            install_dir: self.llvm_install_dir.clone(),
            working_dir: self.llvm_build_dir.clone(),
            build_mode,
        }
    }

    /// CMake inputs for the compiler stage
    pub fn compiler_configuration(&self, build_mode: BuildMode) -> BuildConfiguration {
        BuildConfiguration {
            source_dir: self.repo_dir.clone(),
            install_dir: self.build_dir.clone(),
            working_dir: self.cmake_dir.clone(),
            build_mode,
        }
    }
}

/// Options for one pipeline run
#[derive(Debug, Clone, Copy)]
pub struct SequenceOptions {
    /// CMake build type for both projects
    pub build_mode: BuildMode,
    /// Rebuild LLVM even if it is already installed
    pub rebuild_llvm: bool,
    /// Parallel jobs handed to make
    pub jobs: usize,
    /// Suppress progress banners
    pub quiet: bool,
}

/// Drives the LLVM and compiler stages in order
#[derive(Debug)]
pub struct Sequencer<R> {
    layout: Layout,
    options: SequenceOptions,
    runner: R,
}

impl<R: StageRunner> Sequencer<R> {
    pub fn new(layout: Layout, options: SequenceOptions, runner: R) -> Self {
        Self {
            layout,
            options,
            runner,
        }
    }

    /// Give back the runner
    #[cfg(test)]
    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Whether the LLVM stage has to run
    pub fn should_build_llvm(&self) -> bool {
        self.options.rebuild_llvm || !self.layout.llvm_install_dir.exists()
    }

    /// Run every required stage, stopping at the first failure
    pub async fn run(&mut self) -> Result<(), StageError> {
        if self.should_build_llvm() {
            filesystem::create_dir_all(&self.layout.llvm_install_dir)?;
            let config = self.layout.llvm_configuration(self.options.build_mode);
            self.run_stage(Project::Llvm, &config).await?;
        } else {
            tracing::info!(
                "Skipping {}: already installed in {}",
                Project::Llvm,
                self.layout.llvm_install_dir.display()
            );
        }

        self.prepare_workspace()?;
        let config = self.layout.compiler_configuration(self.options.build_mode);
        self.run_stage(Project::Compiler, &config).await
    }

    /// Replace the compiler build root with empty configuration and output directories
    fn prepare_workspace(&self) -> Result<(), StageError> {
        filesystem::remove_dir_all(&self.layout.build_dir)?;
        filesystem::create_dir_all(&self.layout.cmake_dir)?;
        filesystem::create_dir_all(&self.layout.bin_dir)?;
        Ok(())
    }

    async fn run_stage(
        &mut self,
        project: Project,
        config: &BuildConfiguration,
    ) -> Result<(), StageError> {
        let mut stage = Stage::new(project);

        stage.advance(StageState::Configuring);
        if !self.runner.configure(config).await.succeeded() {
            stage.advance(StageState::Failed);
            return Err(StageError::Configure { project });
        }

        self.announce(&format!("Building the {project}."));
        stage.advance(StageState::Building);
        if !self
            .runner
            .build(&config.working_dir, self.options.jobs)
            .await
            .succeeded()
        {
            stage.advance(StageState::Failed);
            return Err(StageError::Build { project });
        }

        self.announce("Done!");
        stage.advance(StageState::Succeeded);
        Ok(())
    }

    fn announce(&self, message: &str) {
        if !self.options.quiet {
            println!("{message}");
        }
    }
}
