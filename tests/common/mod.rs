//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests: a temporary
//! repository plus fake `cmake` and `make` executables that record how they
//! were called.

use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Fake cmake: logs its arguments and working directory
pub const CMAKE_OK: &str = r#"echo "cmake $* @ $(pwd)" >> "$BFBUILD_TEST_LOG"
echo "-- Configuring done"
echo "-- Generating done"
"#;

/// Fake make: logs its arguments and prints make-style progress
pub const MAKE_OK: &str = r#"echo "make $* @ $(pwd)" >> "$BFBUILD_TEST_LOG"
for p in 0 25 50 75 100; do
    printf '[%3d%%] Building CXX object src/main.cpp.o\n' "$p"
done
echo "Install the project..."
"#;

/// Test repository context
///
/// Layout: `repo/` is the repository handed to bfbuild, `tools/` holds the
/// fake executables and `calls.log` collects their invocations.
pub struct TestProject {
    /// Temporary directory holding everything
    pub dir: TempDir,
}

impl TestProject {
    /// Create a project with well-behaved fake tools
    pub fn new() -> Self {
        let project = Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        };
        project
            .dir
            .child("repo")
            .create_dir_all()
            .expect("Failed to create repo");
        project
            .dir
            .child("tools")
            .create_dir_all()
            .expect("Failed to create tools");
        project
            .dir
            .child("calls.log")
            .touch()
            .expect("Failed to create log");
        project.set_cmake(CMAKE_OK);
        project.set_make(MAKE_OK);
        project
    }

    /// Repository root
    pub fn repo(&self) -> PathBuf {
        self.dir.child("repo").path().to_path_buf()
    }

    /// Path inside the repository
    pub fn repo_path(&self, relative: &str) -> PathBuf {
        self.repo().join(relative)
    }

    /// Replace the fake cmake script body
    pub fn set_cmake(&self, body: &str) {
        self.write_tool("cmake", body);
    }

    /// Replace the fake make script body
    pub fn set_make(&self, body: &str) {
        self.write_tool("make", body);
    }

    fn write_tool(&self, name: &str, body: &str) {
        let tool = self.dir.child("tools").child(name);
        tool.write_str(&format!("#!/bin/sh\n{body}"))
            .expect("Failed to write tool");
        std::fs::set_permissions(tool.path(), std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make tool executable");
    }

    /// Path of a fake tool
    pub fn tool(&self, name: &str) -> PathBuf {
        self.dir.child("tools").child(name).path().to_path_buf()
    }

    /// Create a directory inside the repository
    pub fn create_repo_dir(&self, relative: &str) {
        std::fs::create_dir_all(self.repo_path(relative)).expect("Failed to create directory");
    }

    /// Create a file inside the repository
    pub fn create_repo_file(&self, relative: &str, content: &str) {
        let path = self.repo_path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Lines logged by the fake tools
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.child("calls.log").path())
            .expect("Failed to read log")
            .lines()
            .map(String::from)
            .collect()
    }

    /// Run bfbuild against this project with the fake tools
    pub fn run(&self, args: &[&str]) -> Output {
        self.run_with_tools(&self.tool("cmake"), &self.tool("make"), args)
    }

    /// Run bfbuild against this project with explicit tool paths
    pub fn run_with_tools(&self, cmake: &Path, make: &Path, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_bfbuild"));
        cmd.current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .env("BFBUILD_TEST_LOG", self.dir.child("calls.log").path())
            .arg("--repo-dir")
            .arg(self.repo())
            .arg("--cmake")
            .arg(cmake)
            .arg("--make")
            .arg(make)
            .args(args);
        cmd.output().expect("Failed to execute bfbuild")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical form of `path`, as printed by `pwd` in the fake tools
pub fn canonical(path: &Path) -> String {
    path.canonicalize()
        .expect("Failed to canonicalize path")
        .display()
        .to_string()
}
