//! BibTeX records built from report metadata.
//!
//! A [`BibEntry`] is an immutable value: the `with_*`/`without_*` methods return a
//! modified copy and leave the original untouched.
//!
//! # Examples
//!
//! ```
//! use eprint::{BibEntry, EntryType, Field};
//!
//! let entry = BibEntry::new(EntryType::Misc, "cryptoeprint:2017/1118")
//!   .with_field(Field::Title, "Solida")
//!   .with_field(Field::Url, "https://eprint.iacr.org/2017/1118");
//!
//! let without_url = entry.without_field(Field::Url);
//! assert_eq!(entry.field(Field::Url), Some("https://eprint.iacr.org/2017/1118"));
//! assert_eq!(without_url.field(Field::Url), None);
//! ```

use super::*;

/// The BibTeX entry type of a record.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
  /// `@misc`, used for every ePrint report
  Misc,
}

impl fmt::Display for EntryType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EntryType::Misc => write!(f, "misc"),
    }
  }
}

/// The fields a record can carry, in the order they are rendered.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
  /// `author`, names joined with `" and "`
  Author,
  /// `title`
  Title,
  /// `howpublished`
  #[serde(rename = "howpublished")]
  HowPublished,
  /// `year`
  Year,
  /// `date`, as `yyyy-MM-dd`
  Date,
  /// `version`, a `yyyyMMdd:HHmmss` stamp
  Version,
  /// `doi`
  Doi,
  /// `note`
  Note,
  /// `url`
  Url,
  /// `abstract`
  Abstract,
}

impl Field {
  /// The BibTeX field name.
  pub fn name(&self) -> &'static str {
    match self {
      Field::Author => "author",
      Field::Title => "title",
      Field::HowPublished => "howpublished",
      Field::Year => "year",
      Field::Date => "date",
      Field::Version => "version",
      Field::Doi => "doi",
      Field::Note => "note",
      Field::Url => "url",
      Field::Abstract => "abstract",
    }
  }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// A bibliographic record: entry type, citation key, and field values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibEntry {
  /// BibTeX entry type
  entry_type:   EntryType,
  /// Citation key, e.g. `cryptoeprint:2017/1118`
  citation_key: String,
  /// Field values; absent fields are not stored at all
  fields:       BTreeMap<Field, String>,
}

impl BibEntry {
  /// Creates a record without any fields.
  pub fn new(entry_type: EntryType, citation_key: impl Into<String>) -> Self {
    Self { entry_type, citation_key: citation_key.into(), fields: BTreeMap::new() }
  }

  /// Builds the canonical record of a report from its metadata.
  ///
  /// With a version, `url` is the versioned page and `version` is recorded. Without
  /// one, `url` is the plain page and `note` repeats it as `\url{...}` for renderers
  /// that do not understand versions. `abstract` and `doi` are only set when the
  /// metadata has a non-empty value for them.
  pub fn from_metadata(id: &ReportId, metadata: &Metadata) -> Self {
    let mut entry = Self::new(EntryType::Misc, id.citation_key())
      .with_field(Field::Title, &metadata.title)
      .with_field(Field::Author, metadata.authors.join(" and "))
      .with_field(Field::Date, metadata.publication_date.format("%Y-%m-%d").to_string())
      .with_field(Field::Year, id.year().to_string())
      .with_field(Field::Url, &metadata.source_url)
      .with_field(Field::HowPublished, &metadata.how_published);

    match &metadata.version {
      Some(version) => entry = entry.with_field(Field::Version, version.as_str()),
      None => entry = entry.with_field(Field::Note, format!("\\url{{{}}}", metadata.source_url)),
    }

    if !metadata.abstract_text.trim().is_empty() {
      entry = entry.with_field(Field::Abstract, &metadata.abstract_text);
    }
    if let Some(doi) = metadata.doi.as_deref().filter(|doi| !doi.trim().is_empty()) {
      entry = entry.with_field(Field::Doi, doi);
    }

    trace!("Built entry {}: {:?}", entry.citation_key, entry.fields);
    entry
  }

  /// Returns a copy with `field` set to `value`.
  pub fn with_field(mut self, field: Field, value: impl Into<String>) -> Self {
    self.fields.insert(field, value.into());
    self
  }

  /// Returns a copy without `field`.
  pub fn without_field(&self, field: Field) -> Self {
    let mut entry = self.clone();
    entry.fields.remove(&field);
    entry
  }

  /// Returns a copy with a different citation key.
  pub fn with_citation_key(mut self, citation_key: impl Into<String>) -> Self {
    self.citation_key = citation_key.into();
    self
  }

  /// The entry type.
  pub fn entry_type(&self) -> EntryType { self.entry_type }

  /// The citation key.
  pub fn citation_key(&self) -> &str { &self.citation_key }

  /// The value of `field`, if set.
  pub fn field(&self, field: Field) -> Option<&str> { self.fields.get(&field).map(String::as_str) }

  /// All set fields in rendering order.
  pub fn fields(&self) -> impl Iterator<Item = (Field, &str)> {
    self.fields.iter().map(|(field, value)| (*field, value.as_str()))
  }

  /// Renders the record as a BibTeX entry.
  ///
  /// Values are written verbatim inside braces, so markup such as `{ePrint}` survives.
  ///
  /// ```
  /// use eprint::{BibEntry, EntryType, Field};
  ///
  /// let entry = BibEntry::new(EntryType::Misc, "cryptoeprint:2016/119")
  ///   .with_field(Field::Title, "Lightweight Multiplication in {GF}(2^n)")
  ///   .with_field(Field::Year, "2016");
  ///
  /// assert_eq!(
  ///   entry.to_bibtex(),
  ///   "@misc{cryptoeprint:2016/119,\n  title = {Lightweight Multiplication in {GF}(2^n)},\n  year = {2016}\n}\n"
  /// );
  /// ```
  pub fn to_bibtex(&self) -> String {
    let body = self
      .fields
      .iter()
      .map(|(field, value)| format!("  {} = {{{}}}", field.name(), value))
      .collect::<Vec<_>>()
      .join(",\n");

    format!("@{}{{{},\n{}\n}}\n", self.entry_type, self.citation_key, body)
  }
}
