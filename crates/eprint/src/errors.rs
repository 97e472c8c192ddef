//! Error types for the eprint library.
//!
//! Every fallible operation in the crate returns [`EprintError`]. The variants are
//! grouped into a small set of [`ErrorKind`]s so callers can decide how to report a
//! failure without matching on every wrapped error:
//! - the input never named a report
//! - the archive has no such report, or it was withdrawn
//! - the network or the HTTP exchange failed
//! - a page did not have the expected layout
//! - a record did not come from the archive
//!
//! # Examples
//!
//! ```no_run
//! use eprint::{errors::EprintError, IacrFetcher};
//!
//! # async fn example() -> Result<(), EprintError> {
//! let fetcher = IacrFetcher::new()?;
//! match fetcher.search_by_free_text("1998/016").await {
//!   Err(EprintError::InvalidIdentifier) => println!("No ePrint id in that text"),
//!   Err(EprintError::Withdrawn(id)) => println!("Report {id} was withdrawn"),
//!   Err(e) => println!("Other error: {e}"),
//!   Ok(entry) => println!("Found {}", entry.citation_key()),
//! }
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::identifier::ReportId;

/// Errors that can occur while fetching or resolving ePrint reports.
#[derive(Error, Debug)]
pub enum EprintError {
  /// The input text holds no `yyyy/nnn` pattern with a plausible year and a sequence of
  /// at least three digits.
  #[error("Invalid identifier format")]
  InvalidIdentifier,

  /// The archive has no report for a well-formed identifier.
  #[error("Report not found")]
  NotFound,

  /// The archive lists the report but marks it as withdrawn.
  #[error("Report {0} has been withdrawn")]
  Withdrawn(ReportId),

  /// A network request failed.
  ///
  /// This can occur when:
  /// - The network is unavailable
  /// - The archive is unreachable
  /// - The request times out
  /// - TLS errors occur
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The archive answered with a non-success status other than 404.
  #[error("Unexpected HTTP status {0}")]
  UnexpectedStatus(u16),

  /// A page was fetched but did not have the expected structure.
  ///
  /// This usually means the archive changed its layout. The string names the part
  /// of the page that could not be read.
  #[error("Failed to parse archive page: {0}")]
  ParseFailure(String),

  /// Full-text resolution was asked for a record whose URL does not point at the
  /// archive.
  #[error("Unsupported source: {0}")]
  UnsupportedSource(String),

  /// Failed to parse a URL.
  #[error(transparent)]
  InvalidUrl(#[from] url::ParseError),

  /// A configuration file could not be decoded.
  #[error(transparent)]
  Config(#[from] serde_json::Error),

  /// A configuration file could not be read.
  #[error("Failed to read configuration {}: {source}", .path.display())]
  ConfigRead {
    /// The file that was asked for
    path:   PathBuf,
    /// The underlying IO error
    source: std::io::Error,
  },

  /// The configured archive root is not a URL.
  #[error("Invalid base URL: {0}")]
  InvalidBaseUrl(#[source] url::ParseError),

  /// A file system operation failed.
  ///
  /// This occurs when writing a downloaded PDF.
  #[error(transparent)]
  Path(#[from] std::io::Error),
}

/// Coarse classification of an [`EprintError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// No valid identifier in the input.
  InvalidIdentifier,
  /// No such report.
  NotFound,
  /// The report was withdrawn.
  Withdrawn,
  /// Network or HTTP failure, or a failed PDF write.
  TransportFailure,
  /// The record does not belong to the archive.
  UnsupportedSource,
  /// Page or URL content did not match the expected structure.
  ParseFailure,
  /// The configuration file or base URL is unusable.
  Configuration,
}

impl EprintError {
  /// Returns the [`ErrorKind`] this error belongs to.
  ///
  /// ```
  /// use eprint::{EprintError, ErrorKind};
  ///
  /// assert_eq!(EprintError::UnexpectedStatus(503).kind(), ErrorKind::TransportFailure);
  /// assert_eq!(EprintError::NotFound.kind(), ErrorKind::NotFound);
  /// ```
  pub fn kind(&self) -> ErrorKind {
    match self {
      EprintError::InvalidIdentifier => ErrorKind::InvalidIdentifier,
      EprintError::NotFound => ErrorKind::NotFound,
      EprintError::Withdrawn(_) => ErrorKind::Withdrawn,
      EprintError::Network(_) | EprintError::UnexpectedStatus(_) | EprintError::Path(_) =>
        ErrorKind::TransportFailure,
      EprintError::UnsupportedSource(_) => ErrorKind::UnsupportedSource,
      EprintError::ParseFailure(_) | EprintError::InvalidUrl(_) => ErrorKind::ParseFailure,
      EprintError::Config(_) | EprintError::ConfigRead { .. } | EprintError::InvalidBaseUrl(_) =>
        ErrorKind::Configuration,
    }
  }
}
