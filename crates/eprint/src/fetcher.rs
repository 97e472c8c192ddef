//! The public entry point: free text in, BibTeX record out.
//!
//! [`IacrFetcher`] wires the pieces together: it parses an identifier out of the
//! input, routes it to the extractor for its page layout, and builds the record. The
//! transport is a type parameter so tests can run the whole pipeline against canned
//! pages.

use crate::clients::{LegacyClient, ModernClient};

use super::*;

/// Fetcher for IACR Cryptology ePrint reports.
#[derive(Debug, Clone)]
pub struct IacrFetcher<T = HttpTransport> {
  /// Transport used for every request.
  transport: T,
  /// Archive location and HTTP settings.
  config:    FetcherConfig,
}

impl IacrFetcher<HttpTransport> {
  /// Creates a fetcher for the public archive.
  pub fn new() -> Result<Self, EprintError> { Self::with_config(FetcherConfig::default()) }

  /// Creates a fetcher with an HTTP transport built from `config`.
  pub fn with_config(config: FetcherConfig) -> Result<Self, EprintError> {
    let transport = HttpTransport::new(&config)?;
    Ok(Self { transport, config })
  }
}

impl<T: Transport> IacrFetcher<T> {
  /// Creates a fetcher over a caller-supplied transport.
  pub fn with_transport(transport: T, config: FetcherConfig) -> Self { Self { transport, config } }

  /// The configuration in use.
  pub fn config(&self) -> &FetcherConfig { &self.config }

  /// Finds the first ePrint identifier in `text` and fetches the record of that report.
  ///
  /// The identifier may sit anywhere in the text (`"see ePrint 2017/1118, v2"`). Its
  /// year must lie between 1996 and the current year.
  ///
  /// # Errors
  ///
  /// This function will return an error if:
  /// - The text holds no valid identifier ([`EprintError::InvalidIdentifier`])
  /// - The archive has no such report, or it was withdrawn
  /// - The network request fails or the page cannot be parsed
  pub async fn search_by_free_text(&self, text: &str) -> Result<BibEntry, EprintError> {
    let id = ReportId::parse(text, identifier::current_year())?;
    debug!("Found identifier {id} in {text:?}");
    self.fetch_entry(&id).await
  }

  /// Fetches the record of an already parsed identifier.
  pub async fn fetch_entry(&self, id: &ReportId) -> Result<BibEntry, EprintError> {
    let metadata = self.fetch_metadata(id).await?;
    Ok(BibEntry::from_metadata(id, &metadata))
  }

  /// Fetches the metadata of a report with the extractor for its page layout.
  pub async fn fetch_metadata(&self, id: &ReportId) -> Result<Metadata, EprintError> {
    debug!("Fetching {id} as a {} report", id.format());
    match id.format() {
      ArchiveFormat::Legacy => LegacyClient::new(&self.transport, &self.config).fetch_metadata(id).await,
      ArchiveFormat::Modern => ModernClient::new(&self.transport, &self.config).fetch_metadata(id).await,
    }
  }

  /// Resolves the PDF location of a record. See [`fulltext::resolve_full_text`].
  pub fn find_full_text(&self, entry: &BibEntry) -> Result<Option<Url>, EprintError> {
    fulltext::resolve_full_text(entry, &self.config)
  }

  /// Downloads the PDF of a record into `dir` and returns the written path.
  ///
  /// The file is named `<year>_<sequence>_<title>.pdf`, see [`format::pdf_filename`].
  /// A record without a URL is [`EprintError::NotFound`].
  pub async fn download_full_text(
    &self,
    entry: &BibEntry,
    dir: impl AsRef<Path>,
  ) -> Result<PathBuf, EprintError> {
    let Some(pdf) = self.find_full_text(entry)? else {
      return Err(EprintError::NotFound);
    };

    let bytes = self.transport.get_bytes(pdf.as_str()).await?;
    trace!("Downloaded {} bytes from {pdf}", bytes.len());

    let id = ReportId::parse(pdf.path(), identifier::current_year())?;
    let title = entry.field(Field::Title).unwrap_or_default();
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format::pdf_filename(&id.to_string(), title));
    debug!("Writing PDF to path: {path:?}");
    std::fs::write(&path, bytes)?;
    Ok(path)
  }
}
