//! Extractor for the static pages of reports filed before 2000.
//!
//! These pages were written by hand and never revised in place. Every piece of
//! metadata is a bold label followed by its value:
//!
//! ```html
//! <h2>Cryptology ePrint Archive: Report 1997/006</h2>
//! <p />
//! <b>Title: </b>...
//! <p />
//! <b>Author(s): </b>Jane Doe and John Roe
//! <p />
//! <b>Abstract: </b>...
//! <p />
//! <b>Date: </b>received May 4th, 1997.
//! ```
//!
//! The date line is free text and comes in several spellings; it may also list a
//! revision date after the submission date, in which case the latest one is used.

use super::*;

lazy_static! {
  /// Bold labels introducing a value.
  static ref LABEL: Selector = Selector::parse("b").unwrap();
  /// `1997-05-04`
  static ref ISO_DATE: Regex = Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap();
  /// `May 4th, 1997`, `May 4 1997`, `Sept. 12, 1998`
  static ref MONTH_FIRST_DATE: Regex =
    Regex::new(r"([A-Za-z]{3,9})\.? (\d{1,2})(?:st|nd|rd|th)?,? (\d{4})").unwrap();
  /// `4 May 1997`, `4 May. 1997`
  static ref DAY_FIRST_DATE: Regex = Regex::new(r"(\d{1,2}) ([A-Za-z]{3,9})\.? (\d{4})").unwrap();
  /// Separators between author names.
  static ref AUTHOR_SEPARATOR: Regex = Regex::new(r"\s*(?:,|;|\band\b)\s*").unwrap();
}

/// Client for the pre-2000 report pages.
pub struct LegacyClient<'a, T: ?Sized> {
  /// Transport used for the single page request.
  transport: &'a T,
  /// Archive location.
  config:    &'a FetcherConfig,
}

impl<'a, T: Transport + ?Sized> LegacyClient<'a, T> {
  /// Creates a client borrowing the fetcher's transport and configuration.
  pub fn new(transport: &'a T, config: &'a FetcherConfig) -> Self { Self { transport, config } }

  /// Fetches and parses the page of a pre-2000 report.
  ///
  /// # Errors
  ///
  /// This function will return an error if:
  /// - The archive has no such report ([`EprintError::NotFound`])
  /// - The report was withdrawn ([`EprintError::Withdrawn`])
  /// - The network request fails
  /// - The title, authors, abstract, or date cannot be found on the page
  pub async fn fetch_metadata(&self, id: &ReportId) -> Result<Metadata, EprintError> {
    let url = self.config.url_for(&id.to_string());
    let page = self.transport.get_page(&url).await?;
    trace!("Legacy page for {id}: {}", page.body);

    parse_page(id, &url, &page.body)
  }
}

/// Parses a legacy report page. `url` becomes the metadata's source URL.
pub fn parse_page(id: &ReportId, url: &str, body: &str) -> Result<Metadata, EprintError> {
  let html = Html::parse_document(body);
  if is_missing_report(&html) {
    return Err(EprintError::NotFound);
  }

  let sections = labelled_sections(&html);
  let section = |names: &[&str]| {
    sections
      .iter()
      .find(|(label, _)| names.contains(&label.as_str()))
      .map(|(_, value)| value.clone())
      .filter(|value| !value.is_empty())
  };

  let title = section(&["title"]);
  let date_line = section(&["date"]);
  let withdrawn = date_line.as_deref().is_some_and(|line| line.to_lowercase().contains("withdrawn"))
    || title.as_deref().is_some_and(|title| title.eq_ignore_ascii_case("withdrawn"));
  if withdrawn {
    debug!("Report {id} is marked as withdrawn: {date_line:?}");
    return Err(EprintError::Withdrawn(id.clone()));
  }

  let title = title.ok_or_else(|| missing(id, "title"))?;
  let date_line = date_line.ok_or_else(|| missing(id, "date"))?;

  let authors = section(&["author(s)", "authors", "author"])
    .map(|line| split_authors(&line))
    .filter(|authors| !authors.is_empty())
    .ok_or_else(|| missing(id, "authors"))?;

  let abstract_text = section(&["abstract"]).ok_or_else(|| missing(id, "abstract"))?;

  let publication_date = latest_date(&date_line).ok_or_else(|| {
    EprintError::ParseFailure(format!("unrecognised date {date_line:?} on report {id}"))
  })?;

  Ok(Metadata {
    title,
    authors,
    abstract_text,
    publication_date,
    doi: None,
    version: None,
    source_url: url.to_string(),
    how_published: Metadata::default_how_published(id),
  })
}

/// Collects `(label, value)` pairs from the `<b>Label:</b> value` layout.
///
/// Labels are lowercased without their trailing colon. A value is the text following
/// the label up to the next label or paragraph break.
fn labelled_sections(html: &Html) -> Vec<(String, String)> {
  html
    .select(&LABEL)
    .map(|label| {
      let name = element_text(label).trim_end_matches(':').trim().to_lowercase();
      let mut value = String::new();
      for sibling in label.next_siblings() {
        if let Some(text) = sibling.value().as_text() {
          value.push_str(text);
          continue;
        }
        match ElementRef::wrap(sibling) {
          Some(element) if matches!(element.value().name(), "b" | "p" | "hr" | "h2") => break,
          Some(element) => {
            value.push(' ');
            value.push_str(&element.text().collect::<String>());
          },
          None => {},
        }
      }
      (name, collapse_whitespace(&value))
    })
    .collect()
}

/// Splits an author line such as `A, B and C`.
fn split_authors(line: &str) -> Vec<String> {
  AUTHOR_SEPARATOR
    .split(line.trim_end_matches('.'))
    .map(str::trim)
    .filter(|name| !name.is_empty())
    .map(str::to_string)
    .collect()
}

/// Finds every date in a date line and returns the latest.
///
/// ```text
/// received May 4th, 1997                     -> 1997-05-04
/// received 4 May 1997, revised 20 June 1997  -> 1997-06-20
/// ```
fn latest_date(line: &str) -> Option<NaiveDate> {
  let line = collapse_whitespace(line);
  let iso = ISO_DATE.captures_iter(&line).filter_map(|c| {
    NaiveDate::from_ymd_opt(c[1].parse().ok()?, c[2].parse().ok()?, c[3].parse().ok()?)
  });
  let month_first = MONTH_FIRST_DATE.captures_iter(&line).filter_map(|c| {
    NaiveDate::from_ymd_opt(c[3].parse().ok()?, month_number(&c[1])?, c[2].parse().ok()?)
  });
  let day_first = DAY_FIRST_DATE.captures_iter(&line).filter_map(|c| {
    NaiveDate::from_ymd_opt(c[3].parse().ok()?, month_number(&c[2])?, c[1].parse().ok()?)
  });

  iso.chain(month_first).chain(day_first).max()
}

/// Maps an English month name or an abbreviation of at least three letters to its number.
fn month_number(name: &str) -> Option<u32> {
  const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
  ];
  let name = name.to_lowercase();
  if name.len() < 3 {
    return None;
  }
  MONTHS.iter().position(|month| month.starts_with(name.as_str())).map(|index| index as u32 + 1)
}

#[cfg(test)]
mod tests {
  use super::*;

  const REPORT_1997_006: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/legacy_1997_006.html"));
  const REPORT_1998_016: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/legacy_1998_016_withdrawn.html"));
  const REPORT_1999_011: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/legacy_1999_011.html"));

  fn id(text: &str) -> ReportId { ReportId::parse(text, 2024).unwrap() }

  #[test]
  fn test_parse_legacy_page() {
    let url = "https://eprint.iacr.org/1997/006";
    let metadata = parse_page(&id("1997/006"), url, REPORT_1997_006).unwrap();

    assert_eq!(metadata.title, "Self-Certified Keys for Small Networks");
    assert_eq!(metadata.authors, vec!["Alice Example".to_string(), "Bob Sample".to_string()]);
    assert!(metadata.abstract_text.starts_with("We describe a key distribution scheme"));
    assert!(!metadata.abstract_text.contains("Category"));
    assert_eq!(metadata.publication_date, NaiveDate::from_ymd_opt(1997, 5, 4).unwrap());
    assert_eq!(metadata.version, None);
    assert_eq!(metadata.doi, None);
    assert_eq!(metadata.source_url, url);
    assert_eq!(metadata.how_published, "Cryptology ePrint Archive, Paper 1997/006");
  }

  #[test]
  fn test_revised_report_uses_latest_date() {
    let metadata =
      parse_page(&id("1999/011"), "https://eprint.iacr.org/1999/011", REPORT_1999_011).unwrap();

    assert_eq!(metadata.publication_date, NaiveDate::from_ymd_opt(1999, 8, 2).unwrap());
    assert_eq!(metadata.authors.len(), 3);
    assert_eq!(metadata.authors[2], "Carol Placeholder");
    assert_eq!(metadata.publication_date.format("%Y-%m-%d").to_string().len(), 10);
  }

  #[test]
  fn test_withdrawn_report() {
    let result = parse_page(&id("1998/016"), "https://eprint.iacr.org/1998/016", REPORT_1998_016);
    match result {
      Err(EprintError::Withdrawn(withdrawn)) => assert_eq!(withdrawn, id("1998/016")),
      other => panic!("expected a withdrawn report, got {other:?}"),
    }
  }

  #[test]
  fn test_missing_report() {
    let body = "<html><body><h2>Cryptology ePrint Archive</h2>No such report found.</body></html>";
    let result = parse_page(&id("1996/999"), "https://eprint.iacr.org/1996/999", body);
    assert!(matches!(result, Err(EprintError::NotFound)));
  }

  #[test]
  fn test_unexpected_layout() {
    let body = "<html><body><h1>Maintenance</h1></body></html>";
    let result = parse_page(&id("1997/006"), "https://eprint.iacr.org/1997/006", body);
    assert_eq!(result.unwrap_err().kind(), ErrorKind::ParseFailure);
  }

  #[test]
  fn test_missing_abstract_is_a_parse_failure() {
    let body = REPORT_1997_006.replace("<b>Abstract: </b>", "<b>Keywords: </b>");
    let result = parse_page(&id("1997/006"), "https://eprint.iacr.org/1997/006", &body);
    assert_eq!(result.unwrap_err().kind(), ErrorKind::ParseFailure);

    let empty = "<html><body><b>Title: </b>T<p /><b>Author(s): </b>A<p /><b>Abstract: </b>  \
                 <p /><b>Date: </b>received 4 May 1997</body></html>";
    let result = parse_page(&id("1997/006"), "https://eprint.iacr.org/1997/006", empty);
    assert_eq!(result.unwrap_err().kind(), ErrorKind::ParseFailure);
  }

  #[test]
  fn test_not_found_phrase_inside_abstract() {
    let body = REPORT_1997_006.replace("We describe", "No such report was known, so we describe");
    let metadata = parse_page(&id("1997/006"), "https://eprint.iacr.org/1997/006", &body).unwrap();
    assert!(metadata.abstract_text.contains("No such report"));
  }

  #[test]
  fn test_latest_date_spellings() {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);

    assert_eq!(latest_date("received May 4th, 1997."), date(1997, 5, 4));
    assert_eq!(latest_date("received May 4, 1997"), date(1997, 5, 4));
    assert_eq!(latest_date("received 4 May 1997"), date(1997, 5, 4));
    assert_eq!(latest_date("received 4 Sep. 1998"), date(1998, 9, 4));
    assert_eq!(latest_date("received  December   1st,  1996"), date(1996, 12, 1));
    assert_eq!(latest_date("1997-05-04"), date(1997, 5, 4));
    assert_eq!(latest_date("received 4 May 1997, revised 20 June 1997"), date(1997, 6, 20));
    assert_eq!(latest_date("received sometime"), None);
  }

  #[test]
  fn test_month_number() {
    assert_eq!(month_number("May"), Some(5));
    assert_eq!(month_number("sept"), Some(9));
    assert_eq!(month_number("December"), Some(12));
    assert_eq!(month_number("received"), None);
    assert_eq!(month_number("Ma"), None);
  }

  #[test]
  fn test_split_authors() {
    assert_eq!(split_authors("Jane Doe and Alexander Roe."), vec!["Jane Doe", "Alexander Roe"]);
    assert_eq!(split_authors("A. One, B. Two and C. Three"), vec!["A. One", "B. Two", "C. Three"]);
  }
}
