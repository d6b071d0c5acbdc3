//! Core types shared by every stage of a run
//!
//! - [`error`] - [`RunTemplateError`], [`ErrorContext`] and [`user_friendly_error`]
//! - [`file_error`] - [`FileOperationError`] for reads with their purpose attached

pub mod error;
pub mod file_error;

pub use error::{ErrorContext, RunTemplateError, USAGE, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileResultExt, read_text_file};
