//! Published config source (backend read API)

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::home::{HomePageConfig, Mode};

/// Where published configs come from
pub trait PublishedSource {
    /// `Ok(None)` when nothing is published for `mode`
    fn fetch(&self, mode: Mode) -> impl Future<Output = Result<Option<HomePageConfig>>> + Send;
}

/// Body of `GET /api/public/pages/{mode}`
#[derive(Debug, Deserialize)]
struct PublishedPage {
    #[serde(default)]
    config: Option<HomePageConfig>,
}

/// Reads published configs from the backend over HTTP
pub struct HttpPublishedSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPublishedSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, mode: Mode) -> String {
        format!("{}{}", self.base_url, mode.api_path())
    }
}

impl PublishedSource for HttpPublishedSource {
    async fn fetch(&self, mode: Mode) -> Result<Option<HomePageConfig>> {
        let url = self.url(mode);
        debug!(mode = %mode, url = %url, "fetching published config");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {url}"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let page: PublishedPage = response
            .error_for_status()
            .with_context(|| format!("Backend rejected {url}"))?
            .json()
            .await
            .with_context(|| format!("Failed to parse published config from {url}"))?;

        Ok(page.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let source = HttpPublishedSource::new("https://api.example.com/", Duration::from_secs(1)).unwrap();
        assert_eq!(source.url(Mode::Medical), "https://api.example.com/api/public/pages/medical");
    }

    #[test]
    fn test_published_page_without_config() {
        let page: PublishedPage = serde_json::from_str("{}").unwrap();
        assert!(page.config.is_none());
    }
}
