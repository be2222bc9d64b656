//! Default configuration values

/// Job count used when no host introspection is available
pub const FALLBACK_JOB_COUNT: usize = 3;

/// Extra jobs requested on top of the usable CPU count
pub const EXTRA_JOBS: usize = 1;

/// Default configuration tool executable
pub const DEFAULT_CMAKE: &str = "cmake";

/// Default parallel build tool executable
pub const DEFAULT_MAKE: &str = "make";

/// CMake generator producing Makefiles
pub const CMAKE_GENERATOR: &str = "Unix Makefiles";

/// Cache variable selecting the install prefix
pub const INSTALL_PREFIX_VAR: &str = "CMAKE_INSTALL_PREFIX";

/// Cache variable selecting the build mode
pub const BUILD_TYPE_VAR: &str = "CMAKE_BUILD_TYPE";

/// Make target that builds and installs
pub const INSTALL_TARGET: &str = "install";

/// Build root of the compiler, relative to the repository
pub const BUILD_DIR: &str = "build";

/// Configuration subdirectory of the build root
pub const CMAKE_SUBDIR: &str = "cmake";

/// Output subdirectory of the build root
pub const BIN_SUBDIR: &str = "bin";

/// LLVM source tree, relative to the repository
pub const LLVM_SOURCE_DIR: &str = "vendor/llvm/llvm";

/// Install prefix of LLVM, relative to its build tree
pub const LLVM_INSTALL_SUBDIR: &str = "install";

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
