//! Maps a record to the PDF of the report it describes.
//!
//! The archive serves PDFs at two predictable locations, so resolution is a pure
//! rewrite of the record's `url` field:
//!
//! | record URL                                          | PDF                                     |
//! |-----------------------------------------------------|-----------------------------------------|
//! | `/archive/versions/2017/1118/20171124:064527`       | `/archive/2017/1118/1511505927.pdf`     |
//! | `/2017/1118`                                        | `/2017/1118.pdf`                        |
//!
//! The number in a versioned PDF name is the Unix time of the version stamp, read as
//! UTC.

use super::*;

lazy_static! {
  /// `/<year>/<sequence>` at the end of a report page path, optionally followed by a version.
  static ref REPORT_PATH: Regex =
    Regex::new(r"(?i)/(\d{4})/(\d{3,})(?:/(\d{8}(?::|%3A)\d{6}))?/?$").unwrap();
}

/// Resolves the PDF location for `entry`.
///
/// Returns `Ok(None)` when the record has no `url`. A `url` that does not point at
/// the host of `config.base_url`, or whose path names no report, is
/// [`EprintError::UnsupportedSource`].
///
/// ```
/// use eprint::{fulltext::resolve_full_text, BibEntry, EntryType, FetcherConfig, Field};
///
/// let entry = BibEntry::new(EntryType::Misc, "cryptoeprint:2017/1118").with_field(
///   Field::Url,
///   "https://eprint.iacr.org/archive/versions/2017/1118/20171124:064527",
/// );
/// let pdf = resolve_full_text(&entry, &FetcherConfig::default()).unwrap().unwrap();
/// assert_eq!(pdf.as_str(), "https://eprint.iacr.org/archive/2017/1118/1511505927.pdf");
/// ```
pub fn resolve_full_text(entry: &BibEntry, config: &FetcherConfig) -> Result<Option<Url>, EprintError> {
  let Some(raw) = entry.field(Field::Url) else {
    debug!("Record {} has no URL, nothing to resolve", entry.citation_key());
    return Ok(None);
  };

  let unsupported = || EprintError::UnsupportedSource(raw.to_string());
  let url = Url::parse(raw).map_err(|_| unsupported())?;
  if url.host_str() != Some(config.host()) {
    return Err(unsupported());
  }

  let captures = REPORT_PATH.captures(url.path()).ok_or_else(unsupported)?;
  let (year, sequence) = (&captures[1], &captures[2]);

  let path = match captures.get(3) {
    Some(stamp) => {
      let stamp: VersionStamp = stamp.as_str().replace("%3A", ":").replace("%3a", ":").parse()?;
      format!("archive/{year}/{sequence}/{}.pdf", stamp.unix_timestamp())
    },
    None => format!("{year}/{sequence}.pdf"),
  };

  let pdf = Url::parse(&config.url_for(&path))?;
  trace!("Resolved {raw} to {pdf}");
  Ok(Some(pdf))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(url: Option<&str>) -> BibEntry {
    let entry = BibEntry::new(EntryType::Misc, "cryptoeprint:2017/1118");
    match url {
      Some(url) => entry.with_field(Field::Url, url),
      None => entry,
    }
  }

  fn resolve(url: Option<&str>) -> Result<Option<Url>, EprintError> {
    resolve_full_text(&entry(url), &FetcherConfig::default())
  }

  #[test]
  fn test_versioned_record() {
    let pdf = resolve(Some("https://eprint.iacr.org/archive/versions/2017/1118/20171124:064527"));
    assert_eq!(
      pdf.unwrap().map(String::from).as_deref(),
      Some("https://eprint.iacr.org/archive/2017/1118/1511505927.pdf")
    );
  }

  #[test]
  fn test_percent_encoded_stamp() {
    let pdf = resolve(Some("https://eprint.iacr.org/archive/versions/2017/1118/20171124%3A064527"));
    assert_eq!(
      pdf.unwrap().map(String::from).as_deref(),
      Some("https://eprint.iacr.org/archive/2017/1118/1511505927.pdf")
    );
  }

  #[test]
  fn test_unversioned_record() {
    let pdf = resolve(Some("https://eprint.iacr.org/1997/006"));
    assert_eq!(pdf.unwrap().map(String::from).as_deref(), Some("https://eprint.iacr.org/1997/006.pdf"));
  }

  #[test]
  fn test_record_without_url() {
    assert!(resolve(None).unwrap().is_none());
  }

  #[test]
  fn test_foreign_hosts_are_rejected() {
    for url in ["https://example.com/2017/1118", "not a url", "https://eprint.iacr.org/about"] {
      let result = resolve(Some(url));
      assert_eq!(result.unwrap_err().kind(), ErrorKind::UnsupportedSource, "{url}");
    }
  }

  #[test]
  fn test_resolution_is_stable() {
    let record = entry(Some("https://eprint.iacr.org/archive/versions/2016/119/20170217:150415"));
    let config = FetcherConfig::default();
    let first = resolve_full_text(&record, &config).unwrap();
    let second = resolve_full_text(&record, &config).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn test_follows_configured_base_url() {
    let config = FetcherConfig::default().with_base_url("http://127.0.0.1:4321").unwrap();
    let record = entry(Some("http://127.0.0.1:4321/2017/1118"));
    let pdf = resolve_full_text(&record, &config).unwrap().unwrap();
    assert_eq!(pdf.as_str(), "http://127.0.0.1:4321/2017/1118.pdf");
  }
}
