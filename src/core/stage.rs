//! Stage model
//!
//! A stage is one configure-then-build cycle for one project.

use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;

/// Project built by a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Project {
    /// The vendored LLVM libraries
    Llvm,
    /// The BrainFuck compiler, linked against LLVM
    Compiler,
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Llvm => write!(f, "llvm library"),
            Self::Compiler => write!(f, "BrainFuck compiler"),
        }
    }
}

/// CMake build type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildMode {
    /// Unoptimized build with debug info
    Debug,
    /// Optimized build
    #[default]
    Release,
}

impl BuildMode {
    /// Value passed as `CMAKE_BUILD_TYPE`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs of one configuration run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    /// Directory holding the top-level `CMakeLists.txt`
    pub source_dir: PathBuf,
    /// Install prefix handed to CMake
    pub install_dir: PathBuf,
    /// Directory the tools run in
    pub working_dir: PathBuf,
    /// Build type
    pub build_mode: BuildMode,
}

/// Result of a single runner invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageOutcome {
    /// Exit code of the tool, absent if it never ran or died from a signal
    pub exit_code: Option<i32>,
}

impl StageOutcome {
    /// Outcome of a tool that exited with `status`
    pub fn from_status(status: ExitStatus) -> Self {
        Self {
            exit_code: status.code(),
        }
    }

    /// Outcome of a tool that could not be run to completion
    pub fn not_run() -> Self {
        Self { exit_code: None }
    }

    /// Whether the tool exited with status 0
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Lifecycle of a stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StageState {
    #[default]
    NotStarted,
    Configuring,
    Building,
    Succeeded,
    Failed,
}

impl StageState {
    /// Whether no further transition is possible
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Whether `self -> next` is a legal transition
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::NotStarted, Self::Configuring)
                | (Self::Configuring, Self::Building | Self::Failed)
                | (Self::Building, Self::Succeeded | Self::Failed)
        )
    }
}

/// Tracks the state of one stage
#[derive(Debug)]
pub struct Stage {
    project: Project,
    state: StageState,
}

impl Stage {
    /// Create a stage that has not started yet
    pub fn new(project: Project) -> Self {
        Self {
            project,
            state: StageState::NotStarted,
        }
    }

    /// Current state
    pub fn state(&self) -> StageState {
        self.state
    }

    /// Move to `next`, ignoring illegal transitions
    pub fn advance(&mut self, next: StageState) {
        if self.state.is_terminal() {
            tracing::warn!(
                "{} stage already finished as {:?}, ignoring {:?}",
                self.project,
                self.state,
                next
            );
        } else if self.state.can_transition_to(next) {
            tracing::info!("{} stage: {:?} -> {:?}", self.project, self.state, next);
            self.state = next;
        } else {
            tracing::warn!(
                "Ignoring illegal {} stage transition {:?} -> {:?}",
                self.project,
                self.state,
                next
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_mode_defaults_to_release() {
        assert_eq!(BuildMode::default(), BuildMode::Release);
        assert_eq!(BuildMode::Debug.as_str(), "Debug");
        assert_eq!(BuildMode::Release.to_string(), "Release");
    }

    #[test]
    fn test_outcome_success_requires_zero_exit_code() {
        assert!(StageOutcome { exit_code: Some(0) }.succeeded());
        for code in [1, 2, 127, -1] {
            assert!(!StageOutcome {
                exit_code: Some(code)
            }
            .succeeded());
        }
        assert!(!StageOutcome::not_run().succeeded());
    }

    #[test]
    fn test_stage_happy_path() {
        let mut stage = Stage::new(Project::Llvm);
        stage.advance(StageState::Configuring);
        stage.advance(StageState::Building);
        stage.advance(StageState::Succeeded);
        assert_eq!(stage.state(), StageState::Succeeded);
        assert!(stage.state().is_terminal());
    }

    #[test]
    fn test_stage_cannot_skip_configuring() {
        let mut stage = Stage::new(Project::Compiler);
        stage.advance(StageState::Building);
        assert_eq!(stage.state(), StageState::NotStarted);
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut stage = Stage::new(Project::Compiler);
        stage.advance(StageState::Configuring);
        stage.advance(StageState::Failed);
        stage.advance(StageState::Building);
        assert_eq!(stage.state(), StageState::Failed);
    }

    #[test]
    fn test_only_succeeded_and_failed_are_terminal() {
        for state in [
            StageState::NotStarted,
            StageState::Configuring,
            StageState::Building,
        ] {
            assert!(!state.is_terminal(), "{state:?}");
        }
        assert!(StageState::Succeeded.is_terminal());
        assert!(StageState::Failed.is_terminal());

        let mut stage = Stage::new(Project::Llvm);
        stage.advance(StageState::Configuring);
        stage.advance(StageState::Building);
        stage.advance(StageState::Succeeded);
        stage.advance(StageState::Configuring);
        assert_eq!(stage.state(), StageState::Succeeded);
    }

    #[test]
    fn test_project_display_names() {
        assert_eq!(Project::Llvm.to_string(), "llvm library");
        assert_eq!(Project::Compiler.to_string(), "BrainFuck compiler");
    }
}
