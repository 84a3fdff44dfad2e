//! Error conversion helpers for I/O on document inputs
//!
//! Provides an extension trait for attaching the offending path to I/O errors.

use std::io;
use std::path::Path;

use crate::application::ApplicationResult;
use crate::infrastructure::InfraError;

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// File::open(path).with_path_context("open", path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| InfraError::io(format!("{} {}", action, path.display()), e).into())
    }
}
