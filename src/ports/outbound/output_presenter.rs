use crate::shared::Result;

/// OutputPresenter port for delivering the serialized SPDX document
///
/// Implementations write to stdout or to a file.
pub trait OutputPresenter {
    /// Presents the serialized document
    ///
    /// # Errors
    /// Returns an error if the destination cannot be written, e.g. because the
    /// output path is a symbolic link or its parent directory is missing.
    fn present(&self, content: &str) -> Result<()>;
}
