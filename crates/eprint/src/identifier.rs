//! Report identifiers, archive formats, and version stamps.
//!
//! An ePrint report is named by the year it was filed and a sequence number within that
//! year, written `yyyy/nnn` (e.g. `2017/1118` or `1997/006`). Reports filed before 2000
//! are published in the archive's static [`ArchiveFormat::Legacy`] layout; later reports
//! use the versioned [`ArchiveFormat::Modern`] layout, where every revision is named by
//! a [`VersionStamp`].
//!
//! # Examples
//!
//! ```
//! use eprint::{ArchiveFormat, ReportId};
//!
//! let id = ReportId::parse("see iacr ePrint 2016/119 for details", 2024).unwrap();
//! assert_eq!(id.year(), 2016);
//! assert_eq!(id.sequence(), "119");
//! assert_eq!(id.format(), ArchiveFormat::Modern);
//!
//! let old = ReportId::parse("1997/006", 2024).unwrap();
//! assert_eq!(old.format(), ArchiveFormat::Legacy);
//! ```

use std::{
  cmp::Ordering,
  hash::{Hash, Hasher},
};

use super::*;

/// The first year the archive accepted reports.
pub const FIRST_ARCHIVE_YEAR: i32 = 1996;

/// The year the archive moved from static pages to versioned pages.
pub const MODERN_FORMAT_YEAR: i32 = 2000;

lazy_static! {
  /// Year and sequence, anywhere in the text.
  static ref REPORT_ID: Regex = Regex::new(r"(\d{4})/(\d{3,})").unwrap();
  /// A bare version stamp.
  static ref VERSION_STAMP: Regex = Regex::new(r"^\d{8}:\d{6}$").unwrap();
}

/// The current UTC year, the upper bound for identifier years.
pub fn current_year() -> i32 { Utc::now().year() }

/// A validated `year/sequence` report identifier.
///
/// The sequence keeps the digits exactly as they appeared in the input, so `1997/006`
/// displays with its leading zeros, while comparisons and hashing use its numeric
/// value. Sequences of any length are accepted.
#[derive(Debug, Clone)]
pub struct ReportId {
  /// Year the report was filed
  year:     i32,
  /// Sequence number within the year, as written
  sequence: String,
  /// `sequence` without leading zeros, `"0"` if it is all zeros
  digits:   String,
}

impl ReportId {
  /// Extracts the first report identifier found anywhere in `text`.
  ///
  /// The identifier may be surrounded by arbitrary words, punctuation, or non-ASCII
  /// characters. `current_year` bounds the accepted years from above; pass the
  /// calendar year of "now" (the fetcher does this for you).
  ///
  /// # Errors
  ///
  /// Returns [`EprintError::InvalidIdentifier`] if:
  /// - `text` is empty
  /// - no `yyyy/nnn` pattern is present (e.g. `2016/1` or `16/115`)
  /// - the year lies outside `1996..=current_year`
  pub fn parse(text: &str, current_year: i32) -> Result<Self, EprintError> {
    if text.is_empty() {
      return Err(EprintError::InvalidIdentifier);
    }

    let captures = REPORT_ID.captures(text).ok_or(EprintError::InvalidIdentifier)?;
    let year: i32 = captures[1].parse().map_err(|_| EprintError::InvalidIdentifier)?;
    let sequence = &captures[2];
    trace!("Matched report pattern {year}/{sequence} in {text:?}");

    Self::new(year, sequence, current_year)
  }

  /// Builds an identifier from its parts, applying the same validation as
  /// [`ReportId::parse`].
  pub fn new(year: i32, sequence: &str, current_year: i32) -> Result<Self, EprintError> {
    if !(FIRST_ARCHIVE_YEAR..=current_year).contains(&year) {
      debug!("Rejecting report year {year}, expected {FIRST_ARCHIVE_YEAR}..={current_year}");
      return Err(EprintError::InvalidIdentifier);
    }
    if sequence.len() < 3 || !sequence.bytes().all(|b| b.is_ascii_digit()) {
      return Err(EprintError::InvalidIdentifier);
    }
    let digits = match sequence.trim_start_matches('0') {
      "" => "0",
      digits => digits,
    };

    Ok(Self { year, sequence: sequence.to_string(), digits: digits.to_string() })
  }

  /// The year the report was filed.
  pub fn year(&self) -> i32 { self.year }

  /// The sequence number as it was written, leading zeros included.
  pub fn sequence(&self) -> &str { &self.sequence }

  /// The sequence number as an integer, if it fits in a `u64`.
  pub fn number(&self) -> Option<u64> { self.digits.parse().ok() }

  /// The page layout the archive uses for this report.
  pub fn format(&self) -> ArchiveFormat { ArchiveFormat::for_year(self.year) }

  /// The citation key the archive itself uses, e.g. `cryptoeprint:2017/1118`.
  pub fn citation_key(&self) -> String { format!("cryptoeprint:{self}") }
}

impl fmt::Display for ReportId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.year, self.sequence)
  }
}

impl PartialEq for ReportId {
  fn eq(&self, other: &Self) -> bool { self.year == other.year && self.digits == other.digits }
}

impl Eq for ReportId {}

impl Hash for ReportId {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.year.hash(state);
    self.digits.hash(state);
  }
}

impl PartialOrd for ReportId {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for ReportId {
  fn cmp(&self, other: &Self) -> Ordering {
    (self.year, self.digits.len(), &self.digits).cmp(&(other.year, other.digits.len(), &other.digits))
  }
}

/// The two page layouts the archive has used.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum ArchiveFormat {
  /// Static, unversioned pages of reports filed before 2000
  Legacy,
  /// Versioned pages of reports filed in 2000 or later
  Modern,
}

impl ArchiveFormat {
  /// Selects the layout for a report year. No network access is involved.
  pub fn for_year(year: i32) -> Self {
    if year < MODERN_FORMAT_YEAR {
      ArchiveFormat::Legacy
    } else {
      ArchiveFormat::Modern
    }
  }
}

impl fmt::Display for ArchiveFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ArchiveFormat::Legacy => write!(f, "legacy"),
      ArchiveFormat::Modern => write!(f, "modern"),
    }
  }
}

/// A revision stamp of a modern-format report, written `yyyyMMdd:HHmmss`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionStamp {
  /// The stamp text exactly as published
  raw:       String,
  /// The instant the stamp denotes
  timestamp: NaiveDateTime,
}

impl VersionStamp {
  /// The stamp as published, e.g. `20171124:064527`.
  pub fn as_str(&self) -> &str { &self.raw }

  /// The calendar date of the revision.
  pub fn date(&self) -> NaiveDate { self.timestamp.date() }

  /// Seconds since the Unix epoch, reading the stamp as UTC.
  ///
  /// The archive names the PDF of each revision after this number.
  ///
  /// ```
  /// use eprint::VersionStamp;
  ///
  /// let stamp: VersionStamp = "20171124:064527".parse().unwrap();
  /// assert_eq!(stamp.unix_timestamp(), 1511505927);
  /// ```
  pub fn unix_timestamp(&self) -> i64 { self.timestamp.and_utc().timestamp() }
}

impl FromStr for VersionStamp {
  type Err = EprintError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if !VERSION_STAMP.is_match(s) {
      return Err(EprintError::ParseFailure(format!("malformed version stamp {s:?}")));
    }
    let timestamp = NaiveDateTime::parse_from_str(s, "%Y%m%d:%H%M%S")
      .map_err(|e| EprintError::ParseFailure(format!("invalid version stamp {s:?}: {e}")))?;
    Ok(Self { raw: s.to_string(), timestamp })
  }
}

impl TryFrom<String> for VersionStamp {
  type Error = EprintError;

  fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl From<VersionStamp> for String {
  fn from(stamp: VersionStamp) -> Self { stamp.raw }
}

impl fmt::Display for VersionStamp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.raw) }
}
