//! The metadata both page layouts are reduced to before a record is built.

use super::*;

/// Metadata of one ePrint report, independent of the page layout it was read from.
///
/// The legacy extractor never sets [`Metadata::version`]; the modern extractor sets it
/// whenever the archive redirected to a versioned page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
  /// The report title, brace markup (e.g. `{GF}`) kept as published
  pub title:            String,
  /// Author names in publication order
  pub authors:          Vec<String>,
  /// The abstract text
  pub abstract_text:    String,
  /// Date of the latest revision
  pub publication_date: NaiveDate,
  /// DOI of the published version, if any
  pub doi:              Option<String>,
  /// The revision the page belongs to
  pub version:          Option<VersionStamp>,
  /// The page the metadata was read from
  pub source_url:       String,
  /// e.g. `Cryptology {ePrint} Archive, Paper 2017/1118`
  pub how_published:    String,
}

impl Metadata {
  /// The label used when a page carries none of its own.
  pub fn default_how_published(id: &ReportId) -> String {
    format!("Cryptology ePrint Archive, Paper {id}")
  }
}
