//! Metadata extractors for the two page layouts of the archive.
//!
//! Each submodule turns one layout into the common [`Metadata`] shape:
//! - [`legacy`] - the static pages of reports filed before 2000
//! - [`modern`] - the versioned pages of reports filed since 2000
//!
//! Which one runs is decided by [`ReportId::format`] before any request is made.
//!
//! # Examples
//!
//! ```no_run
//! use eprint::{
//!   clients::{LegacyClient, ModernClient},
//!   FetcherConfig, HttpTransport, ReportId,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FetcherConfig::default();
//! let transport = HttpTransport::new(&config)?;
//!
//! let old = ReportId::parse("1997/006", 2024)?;
//! let metadata = LegacyClient::new(&transport, &config).fetch_metadata(&old).await?;
//! println!("Received: {}", metadata.publication_date);
//!
//! let new = ReportId::parse("2017/1118", 2024)?;
//! let metadata = ModernClient::new(&transport, &config).fetch_metadata(&new).await?;
//! println!("Version: {:?}", metadata.version);
//! # Ok(())
//! # }
//! ```

use scraper::{ElementRef, Html, Selector};

pub mod legacy;
pub mod modern;

pub use legacy::LegacyClient;
pub use modern::ModernClient;

use super::*;

/// Text the archive shows instead of a report when the id is unknown.
const NO_SUCH_REPORT: &str = "No such report";

/// Concatenates the text below `element` and collapses runs of whitespace.
fn element_text(element: ElementRef<'_>) -> String {
  collapse_whitespace(&element.text().collect::<String>())
}

/// Collapses runs of whitespace into single spaces and trims the ends.
fn collapse_whitespace(text: &str) -> String { text.split_whitespace().collect::<Vec<_>>().join(" ") }

/// Text of the first element matching `selector`, if it has any.
fn first_text(html: &Html, selector: &Selector) -> Option<String> {
  html.select(selector).map(element_text).find(|text| !text.is_empty())
}

lazy_static! {
  /// Elements the archive puts its "unknown report" notice in.
  static ref NOTICE: Selector = Selector::parse("title, h1, h2, h3, h4, .alert").unwrap();
  /// The document body.
  static ref BODY: Selector = Selector::parse("body").unwrap();
}

/// Whether the archive answered with its "unknown report" page.
///
/// Only headings, notice boxes, and text directly inside `<body>` count, so a report
/// whose abstract happens to contain the phrase is still read.
fn is_missing_report(html: &Html) -> bool {
  let in_notice = html.select(&NOTICE).any(|element| element_text(element).contains(NO_SUCH_REPORT));
  let in_body = html
    .select(&BODY)
    .flat_map(|body| body.children())
    .any(|node| node.value().as_text().is_some_and(|text| text.contains(NO_SUCH_REPORT)));
  in_notice || in_body
}

/// Builds an error for a page part that could not be read.
fn missing(id: &ReportId, part: &str) -> EprintError {
  EprintError::ParseFailure(format!("no {part} found on the page of report {id}"))
}
