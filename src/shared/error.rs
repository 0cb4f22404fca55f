use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between failures caused by the
/// invocation itself and failures while generating the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// The SPDX document was generated and written
    Success = 0,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (listing, manifest, license text, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for SBOM generation.
///
/// Every variant carries a hint line so the CLI can print something actionable.
#[derive(Debug, Error)]
pub enum SbomError {
    #[error("pnpm listing not found: {path}\n\n💡 Hint: {suggestion}")]
    ListingNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse pnpm listing: {path}\nDetails: {details}\n\n💡 Hint: The listing must be the output of `pnpm list --json --depth Infinity --recursive`")]
    ListingParseError { path: PathBuf, details: String },

    #[error("Failed to read package manifest: {path}\nDetails: {details}\n\n💡 Hint: Run `pnpm install` so that every module has a package.json on disk")]
    ManifestReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid project path: {path}\nReason: {reason}\n\n💡 Hint: Please specify the root directory of a pnpm workspace")]
    InvalidProjectPath { path: PathBuf, reason: String },

    /// Validation error for builders and configuration values
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to provide the license text for '{license_id}'\nDetails: {details}\n\n💡 Hint: Add a file named after the license id to one of the license text directories")]
    LicenseTextError { license_id: String, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}
