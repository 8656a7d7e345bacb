//! Blocking HTTP layer shared by the ČSFD and IMDb clients.

use std::time::Duration;

use anyhow::{Context, Result};
use scraper::Html;

use crate::error::FetchError;
use crate::settings::Settings;

/// ČSFD serves bots a bare interstitial and IMDb trims its markup without a
/// browser-looking User-Agent, so we ship one by default.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/74.0.3729.169 Safari/537.36";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Seam over page retrieval. The extractors and the pipeline only ever see
/// this trait, which lets tests feed them canned fixture pages.
pub trait Fetch {
    fn get(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetch a page and hand it to the HTML parser.
pub fn fetch_document(fetcher: &impl Fetch, url: &str) -> Result<Html, FetchError> {
    let body = fetcher.get(url)?;
    Ok(Html::parse_document(&body))
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let timeout = settings.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let user_agent = settings.user_agent.as_deref().unwrap_or(BROWSER_USER_AGENT);

        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().map_err(|source| {
            FetchError::Request {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}

/// Serves canned bodies by exact URL; anything unregistered comes back as a
/// 404 so error paths are easy to stage.
#[cfg(test)]
#[derive(Default)]
pub struct StubFetcher {
    pages: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }
}

#[cfg(test)]
impl Fetch for StubFetcher {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_serves_registered_pages() {
        let stub = StubFetcher::new().page("http://x/a", "<html>a</html>");
        assert_eq!(stub.get("http://x/a").unwrap(), "<html>a</html>");
    }

    #[test]
    fn stub_404s_unknown_urls() {
        let stub = StubFetcher::new();
        match stub.get("http://x/missing") {
            Err(FetchError::Status { status, .. }) => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND)
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
