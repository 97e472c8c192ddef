//! Extractor for the versioned pages of reports filed since 2000.
//!
//! Reports in this era can be revised, and every revision gets its own page under
//! `/archive/versions/<year>/<sequence>/<yyyyMMdd:HHmmss>`. Requesting
//! `/archive/<year>/<sequence>` redirects to the newest revision, so the URL the
//! transport ends up at tells us which version we are looking at.
//!
//! The page carries the metadata twice: as HTML and as a ready-made BibTeX block
//! (`<pre id="bibtex">`). The BibTeX block is preferred for the title, authors, and
//! how-published label because it keeps the archive's brace markup (`{ePrint}`,
//! `{GF}`) that a BibTeX consumer needs; the HTML is the fallback and the only source
//! of the abstract and the revision history.

use super::*;

lazy_static! {
  /// Trailing version stamp of a versioned page URL; `:` may arrive percent-encoded.
  static ref VERSION_IN_URL: Regex = Regex::new(r"(?i)/(\d{8})(?::|%3A)(\d{6})/?$").unwrap();
  /// `name = {` at the start of a BibTeX field.
  static ref BIBTEX_FIELD: Regex = Regex::new(r"(?m)^\s*([A-Za-z]+)\s*=\s*\{").unwrap();
  /// Dates in the history list.
  static ref HISTORY_DATE: Regex = Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap();
  /// The embedded BibTeX record.
  static ref BIBTEX: Selector = Selector::parse("pre#bibtex").unwrap();
  /// The report title.
  static ref TITLE: Selector = Selector::parse("h3").unwrap();
  /// One author name each.
  static ref AUTHOR: Selector = Selector::parse("span.authorName").unwrap();
  /// Section headings such as `Abstract`.
  static ref HEADING: Selector = Selector::parse("h5").unwrap();
  /// Terms of the metadata list, e.g. `History` or `DOI`.
  static ref TERM: Selector = Selector::parse("dt").unwrap();
  /// Notice boxes, used for withdrawal notes.
  static ref ALERT: Selector = Selector::parse(".alert").unwrap();
}

/// Client for the post-2000, versioned report pages.
pub struct ModernClient<'a, T: ?Sized> {
  /// Transport used for the single page request.
  transport: &'a T,
  /// Archive location.
  config:    &'a FetcherConfig,
}

impl<'a, T: Transport + ?Sized> ModernClient<'a, T> {
  /// Creates a client borrowing the fetcher's transport and configuration.
  pub fn new(transport: &'a T, config: &'a FetcherConfig) -> Self { Self { transport, config } }

  /// Fetches the newest revision of a report and parses it.
  ///
  /// # Errors
  ///
  /// This function will return an error if:
  /// - The archive has no such report ([`EprintError::NotFound`])
  /// - The report was withdrawn ([`EprintError::Withdrawn`])
  /// - The network request fails
  /// - The title, authors, or a date cannot be found on the page
  pub async fn fetch_metadata(&self, id: &ReportId) -> Result<Metadata, EprintError> {
    let url = self.config.url_for(&format!("archive/{id}"));
    let page = self.transport.get_page(&url).await?;
    debug!("{url} resolved to {}", page.final_url);
    trace!("Modern page for {id}: {}", page.body);

    let plain_url = self.config.url_for(&id.to_string());
    parse_page(id, &page, &plain_url)
  }
}

/// Reads the version stamp off a (redirect-resolved) page URL.
///
/// ```
/// use eprint::clients::modern::version_from_url;
///
/// let url = "https://eprint.iacr.org/archive/versions/2017/1118/20171124:064527";
/// assert_eq!(version_from_url(url).unwrap().as_str(), "20171124:064527");
/// assert!(version_from_url("https://eprint.iacr.org/2017/1118").is_none());
/// ```
pub fn version_from_url(url: &str) -> Option<VersionStamp> {
  let captures = VERSION_IN_URL.captures(url)?;
  format!("{}:{}", &captures[1], &captures[2]).parse().ok()
}

/// Parses a modern report page.
///
/// With a version stamp in `page.final_url`, that URL becomes the source URL;
/// otherwise `plain_url`, the unversioned link to the report, does.
pub fn parse_page(id: &ReportId, page: &Page, plain_url: &str) -> Result<Metadata, EprintError> {
  let html = Html::parse_document(&page.body);
  if is_missing_report(&html) {
    return Err(EprintError::NotFound);
  }

  if is_withdrawn(&html) {
    debug!("Report {id} is marked as withdrawn");
    return Err(EprintError::Withdrawn(id.clone()));
  }

  let version = version_from_url(&page.final_url);
  let source_url = match &version {
    Some(_) => page.final_url.clone(),
    None => plain_url.to_string(),
  };

  let bibtex = html.select(&BIBTEX).next().map(|pre| bibtex_fields(&pre.text().collect::<String>()));
  let from_bibtex = |name: &str| bibtex.as_ref().and_then(|fields| fields.get(name)).cloned();

  let title = from_bibtex("title")
    .or_else(|| {
      warn!("No BibTeX title for {id}, falling back to the page heading");
      first_text(&html, &TITLE)
    })
    .ok_or_else(|| missing(id, "title"))?;

  let mut authors: Vec<String> =
    html.select(&AUTHOR).map(element_text).filter(|name| !name.is_empty()).collect();
  if authors.is_empty() {
    authors = from_bibtex("author")
      .map(|line| line.split(" and ").map(|name| name.trim().to_string()).collect())
      .unwrap_or_default();
  }
  if authors.is_empty() {
    return Err(missing(id, "authors"));
  }

  let abstract_text = section_after_heading(&html, "Abstract").unwrap_or_else(|| {
    warn!("Report {id} has no abstract");
    String::new()
  });

  let doi = definition(&html, "DOI").or_else(|| from_bibtex("doi")).filter(|doi| !doi.is_empty());

  let publication_date = definition(&html, "History")
    .and_then(|history| latest_history_date(&history))
    .or_else(|| version.as_ref().map(VersionStamp::date))
    .ok_or_else(|| missing(id, "publication date"))?;

  let how_published =
    from_bibtex("howpublished").unwrap_or_else(|| Metadata::default_how_published(id));

  Ok(Metadata {
    title,
    authors,
    abstract_text,
    publication_date,
    doi,
    version,
    source_url,
    how_published,
  })
}

/// Whether the page announces that the report was withdrawn.
fn is_withdrawn(html: &Html) -> bool {
  let title_withdrawn = first_text(html, &TITLE).is_some_and(|title| {
    let title = title.to_lowercase();
    title == "withdrawn" || title.contains("has been withdrawn")
  });
  let alert_withdrawn =
    html.select(&ALERT).any(|alert| element_text(alert).to_lowercase().contains("withdrawn"));
  let history_withdrawn = definition(html, "History")
    .is_some_and(|history| history.to_lowercase().contains("withdrawn"));

  title_withdrawn || alert_withdrawn || history_withdrawn
}

/// Text of the first element following the `<h5>` heading named `name`.
fn section_after_heading(html: &Html, name: &str) -> Option<String> {
  let heading = html.select(&HEADING).find(|heading| element_text(*heading) == name)?;
  let section = heading.next_siblings().find_map(ElementRef::wrap)?;
  let text = section.text().collect::<String>();
  let text = text.trim();
  (!text.is_empty()).then(|| text.to_string())
}

/// Value of the `<dd>` following the `<dt>` term named `term` in the metadata list.
fn definition(html: &Html, term: &str) -> Option<String> {
  let term = html.select(&TERM).find(|dt| element_text(*dt).eq_ignore_ascii_case(term))?;
  let value = term
    .next_siblings()
    .filter_map(ElementRef::wrap)
    .find(|element| element.value().name() == "dd")?;
  Some(element_text(value))
}

/// The latest `yyyy-MM-dd` date in the history list.
fn latest_history_date(history: &str) -> Option<NaiveDate> {
  HISTORY_DATE
    .find_iter(history)
    .filter_map(|date| NaiveDate::parse_from_str(date.as_str(), "%Y-%m-%d").ok())
    .max()
}

/// Splits the archive's BibTeX block into `field -> value`.
///
/// Values are read up to their balancing brace, so nested markup like
/// `Cryptology {ePrint} Archive` is kept intact. Whitespace runs are collapsed.
fn bibtex_fields(bibtex: &str) -> BTreeMap<String, String> {
  let mut fields = BTreeMap::new();
  for captures in BIBTEX_FIELD.captures_iter(bibtex) {
    let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else { continue };

    let mut depth = 1usize;
    let mut end = None;
    for (offset, c) in bibtex[whole.end()..].char_indices() {
      match c {
        '{' => depth += 1,
        '}' => {
          depth -= 1;
          if depth == 0 {
            end = Some(whole.end() + offset);
            break;
          }
        },
        _ => {},
      }
    }

    match end {
      Some(end) => {
        let value = collapse_whitespace(&bibtex[whole.end()..end]);
        fields.insert(name.as_str().to_lowercase(), value);
      },
      None => warn!("Unbalanced braces in BibTeX field {}", name.as_str()),
    }
  }
  fields
}
