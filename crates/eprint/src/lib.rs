//! A library for turning free text that mentions an IACR Cryptology ePrint report
//! (e.g. "see ePrint 2017/1118") into a BibTeX record, and for resolving such a record
//! into a direct link to the report's PDF.
//!
//! The archive has published reports in two page layouts over the years: a static
//! layout for reports filed before 2000 and a versioned layout since. Both are handled
//! behind the same [`IacrFetcher`] interface.
//!
//! # Example
//! ```rust,no_run
//! use eprint::IacrFetcher;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!   let fetcher = IacrFetcher::new()?;
//!   let entry = fetcher.search_by_free_text("Report 2017/1118").await?;
//!   println!("{}", entry.to_bibtex());
//!
//!   if let Some(pdf) = fetcher.find_full_text(&entry)? {
//!     println!("PDF: {pdf}");
//!   }
//!   Ok(())
//! }
//! ```

#![warn(missing_docs, clippy::missing_docs_in_private_items)]
use std::{
  collections::BTreeMap,
  fmt,
  path::{Path, PathBuf},
  str::FromStr,
};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
#[cfg(test)] use tracing_test::traced_test;
use url::Url;

pub mod clients;
pub mod config;
pub mod entry;
pub mod errors;
pub mod fetcher;
pub mod format;
pub mod fulltext;
pub mod identifier;
pub mod metadata;
pub mod transport;

pub use config::FetcherConfig;
pub use entry::{BibEntry, EntryType, Field};
pub use errors::{EprintError, ErrorKind};
pub use fetcher::IacrFetcher;
pub use identifier::{ArchiveFormat, ReportId, VersionStamp};
pub use metadata::Metadata;
pub use transport::{HttpTransport, Page, Transport};
