//! Error types for the eprint command line tool.
//!
//! Library failures are passed through unchanged so their messages reach the user as
//! written; the remaining variants cover what only the binary does, namely printing
//! JSON and touching the file system.

use thiserror::Error;

/// Errors that can occur while running a CLI command.
#[derive(Error, Debug)]
pub enum EprintCliError {
  /// Errors from the underlying eprint library
  #[error(transparent)]
  Eprint(#[from] eprint::EprintError),

  /// Failure to render a record as JSON
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// File system and IO operation errors
  #[error(transparent)]
  IO(#[from] std::io::Error),
}
