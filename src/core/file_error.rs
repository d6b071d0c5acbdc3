//! Structured file system errors
//!
//! File failures carry what was being read and why, captured at the call
//! site, instead of being reconstructed from `io::Error` messages later.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Types of file operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Reading a file completely
    Read,
    /// Listing a directory
    ReadDir,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::ReadDir => write!(f, "listing directory"),
        }
    }
}

/// A failed file operation with its full context
#[derive(Error, Debug)]
#[error("File operation failed: {operation} {}", .file_path.display())]
pub struct FileOperationError {
    /// The type of operation that failed
    pub operation: FileOperation,
    /// The path that was being accessed
    pub file_path: PathBuf,
    /// Why the path was being accessed
    pub purpose: String,
    /// What code initiated the operation
    pub caller: String,
    /// The underlying IO error
    #[source]
    pub source: std::io::Error,
}

impl FileOperationError {
    /// Get a user-friendly error message with context
    pub fn user_message(&self) -> String {
        let mut message = format!(
            "Failed {} '{}' for {} ({})",
            self.operation,
            self.file_path.display(),
            self.purpose,
            self.caller
        );

        match self.source.kind() {
            std::io::ErrorKind::NotFound => {
                message.push_str("\n\nThe path does not exist.");
                if self.purpose.contains("spec") || self.purpose.contains("jobs") {
                    message.push_str(
                        "\nJob specs are read from <release>/jobs/<job>/spec; \
                         run from the release root or pass --release-dir.",
                    );
                }
            }
            std::io::ErrorKind::PermissionDenied => {
                message.push_str(&format!(
                    "\n\nPermission denied. Check permissions for: {}",
                    self.file_path.display()
                ));
            }
            std::io::ErrorKind::InvalidData => {
                message.push_str("\n\nThe file contains invalid data or encoding.");
                message.push_str("\nEnsure the file contains valid UTF-8 text.");
            }
            _ => {
                message.push_str(&format!("\n\nError details: {}", self.source));
            }
        }

        message
    }
}

/// Extension trait for `io::Result` to add file operation context
pub trait FileResultExt<T> {
    /// Attach operation, path, purpose and caller to an I/O failure
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Result<T, FileOperationError>;
}

impl<T> FileResultExt<T> for Result<T, std::io::Error> {
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Result<T, FileOperationError> {
        self.map_err(|source| FileOperationError {
            operation,
            file_path: file_path.into(),
            purpose: purpose.into(),
            caller: caller.into(),
            source,
        })
    }
}

/// Read a whole text file, recording why it was read.
pub fn read_text_file(
    path: &Path,
    purpose: &str,
    caller: &str,
) -> Result<String, FileOperationError> {
    std::fs::read_to_string(path).with_file_context(FileOperation::Read, path, purpose, caller)
}
