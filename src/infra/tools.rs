//! External tool resolution
//!
//! CMake and Make are located once, before any stage runs.

use std::path::{Path, PathBuf};

use crate::error::ToolError;

/// Executables driven by the stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// Configuration tool
    pub cmake: PathBuf,
    /// Parallel build tool
    pub make: PathBuf,
}

impl ToolPaths {
    /// Resolve both tools through PATH (or as given, if they are paths)
    pub fn resolve(cmake: &Path, make: &Path) -> Result<Self, ToolError> {
        Ok(Self {
            cmake: resolve_tool(cmake)?,
            make: resolve_tool(make)?,
        })
    }
}

/// Locate a single executable
pub fn resolve_tool(tool: &Path) -> Result<PathBuf, ToolError> {
    let path = which::which(tool).map_err(|e| ToolError::NotFound {
        tool: tool.display().to_string(),
        error: e.to_string(),
    })?;
    tracing::debug!("Resolved {} to {}", tool.display(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_resolve_tool_on_path() {
        let path = resolve_tool(Path::new("sh")).unwrap();
        assert!(path.is_absolute());
    }

    #[test]
    fn test_resolve_missing_tool() {
        let err = resolve_tool(Path::new("bfbuild-no-such-tool")).unwrap_err();
        assert!(err.to_string().contains("bfbuild-no-such-tool not found"));
    }
}
