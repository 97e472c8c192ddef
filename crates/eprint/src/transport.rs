//! HTTP access to the archive.
//!
//! The extractors only ever see a [`Transport`]: something that GETs a URL and reports
//! the page body together with the URL it ended up at after redirects. The default
//! [`HttpTransport`] is backed by `reqwest`; tests substitute an in-memory one.

use super::*;

/// A fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
  /// The URL the content was served from, after following redirects
  pub final_url: String,
  /// The response body as text
  pub body:      String,
}

/// The capability of fetching documents from the archive.
///
/// Implementations follow redirects themselves and must report HTTP 404 as
/// [`EprintError::NotFound`] so the extractors can tell a missing report apart from a
/// failing network.
#[async_trait]
pub trait Transport: Send + Sync {
  /// GETs `url` and returns the page it resolves to.
  async fn get_page(&self, url: &str) -> Result<Page, EprintError>;

  /// GETs `url` and returns the raw response bytes.
  async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, EprintError>;
}

/// [`Transport`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
  /// Internal web client used to connect to the archive.
  client: reqwest::Client,
}

impl HttpTransport {
  /// Creates a transport with the user agent and timeout from `config`.
  pub fn new(config: &FetcherConfig) -> Result<Self, EprintError> {
    let client = reqwest::Client::builder()
      .user_agent(config.user_agent.clone())
      .timeout(config.timeout())
      .build()?;
    Ok(Self { client })
  }

  /// Sends the request and maps error statuses.
  async fn send(&self, url: &str) -> Result<reqwest::Response, EprintError> {
    debug!("Fetching from IACR: {url}");
    let response = self.client.get(url).send().await?;
    let status = response.status();
    trace!("{url} answered {status}, final URL {}", response.url());

    if status == reqwest::StatusCode::NOT_FOUND {
      return Err(EprintError::NotFound);
    }
    if !status.is_success() {
      return Err(EprintError::UnexpectedStatus(status.as_u16()));
    }
    Ok(response)
  }
}

#[async_trait]
impl Transport for HttpTransport {
  async fn get_page(&self, url: &str) -> Result<Page, EprintError> {
    let response = self.send(url).await?;
    let final_url = response.url().to_string();
    let body = response.text().await?;
    Ok(Page { final_url, body })
  }

  async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, EprintError> {
    let response = self.send(url).await?;
    Ok(response.bytes().await?.to_vec())
  }
}

#[cfg(test)]
mod tests {
  use mockito::Server;

  use super::*;

  fn transport() -> HttpTransport { HttpTransport::new(&FetcherConfig::default()).unwrap() }

  #[traced_test]
  #[tokio::test]
  async fn test_follows_redirects_and_reports_final_url() {
    let mut server = Server::new_async().await;
    let _redirect = server
      .mock("GET", "/archive/2017/1118")
      .with_status(302)
      .with_header("location", "/archive/versions/2017/1118/20171124:064527")
      .create_async()
      .await;
    let _page = server
      .mock("GET", "/archive/versions/2017/1118/20171124:064527")
      .with_status(200)
      .with_header("content-type", "text/html")
      .with_body("<html><body>ok</body></html>")
      .create_async()
      .await;

    let page = transport().get_page(&format!("{}/archive/2017/1118", server.url())).await.unwrap();

    assert_eq!(page.final_url, format!("{}/archive/versions/2017/1118/20171124:064527", server.url()));
    assert!(page.body.contains("ok"));
  }

  #[tokio::test]
  async fn test_maps_statuses() {
    let mut server = Server::new_async().await;
    let _missing = server.mock("GET", "/2016/6425").with_status(404).create_async().await;
    let _busy = server.mock("GET", "/2016/119").with_status(500).create_async().await;

    let transport = transport();
    let missing = transport.get_page(&format!("{}/2016/6425", server.url())).await;
    assert!(matches!(missing, Err(EprintError::NotFound)));

    let busy = transport.get_page(&format!("{}/2016/119", server.url())).await;
    assert!(matches!(busy, Err(EprintError::UnexpectedStatus(500))));
    assert_eq!(busy.unwrap_err().kind(), ErrorKind::TransportFailure);
  }

  #[tokio::test]
  async fn test_get_bytes() {
    let mut server = Server::new_async().await;
    let _pdf = server
      .mock("GET", "/2017/1118.pdf")
      .with_status(200)
      .with_header("content-type", "application/pdf")
      .with_body(b"%PDF-1.4")
      .create_async()
      .await;

    let bytes = transport().get_bytes(&format!("{}/2017/1118.pdf", server.url())).await.unwrap();
    assert_eq!(bytes, b"%PDF-1.4");
  }
}
