use std::time::Duration;

use reqwest::Client as ReqwestClient;

use crate::catalog::{CatalogEntry, parse_listing};
use crate::errors::{O2tvError, Result};

/// path of the full series index on the catalog site.
const SERIES_INDEX_PATH: &str = "/search/list_all_tv_series";

pub struct CatalogClient {
    base_domain: String,
    client: ReqwestClient,
    max_retries: usize,
}

impl CatalogClient {
    pub(crate) fn new(base_domain: String, timeout: Duration, max_retries: usize) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(O2tvError::BuildClient)?;

        Ok(Self {
            base_domain,
            client,
            max_retries: max_retries.max(1),
        })
    }

    pub fn series_index_url(&self) -> String {
        format!("https://{}{SERIES_INDEX_PATH}", self.base_domain)
    }

    /// fetches and parses the full series index.
    pub async fn fetch_series_index(&self) -> Result<Vec<CatalogEntry>> {
        let url = self.series_index_url();
        let page = self.fetch_text(&url).await?;
        Ok(parse_listing(&page))
    }

    /// fetches and parses any listing page (seasons of a series, episodes
    /// of a season).
    pub async fn fetch_listing(&self, link: &str) -> Result<Vec<CatalogEntry>> {
        let page = self.fetch_text(link).await?;
        Ok(parse_listing(&page))
    }

    /// whole-body text fetch with a bounded retry loop. every transient
    /// failure (transport error or non-success status) logs a retry notice;
    /// spending the budget is fatal.
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.try_fetch_text(url).await {
                Ok(text) => return Ok(text),
                Err(err) if attempt < self.max_retries => {
                    tracing::info!(error = %err, "couldn't connect to the catalog, retrying");
                }
                Err(err) => {
                    tracing::debug!(error = %err, url, "listing fetch retry budget spent");
                    return Err(O2tvError::NetworkExhausted {
                        url: url.to_string(),
                        attempts: attempt,
                    });
                }
            }
        }
    }

    async fn try_fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| O2tvError::Request {
                context: format!("getting listing page {url}"),
                source,
            })?;

        if !response.status().is_success() {
            return Err(O2tvError::HttpStatus {
                context: format!("listing page {url}"),
                status: response.status(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| O2tvError::ResponseBody {
                context: format!("reading listing page {url}"),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_index_url_uses_the_configured_domain() {
        let client = CatalogClient::new(
            "o2tvseries.com".to_string(),
            Duration::from_secs(60),
            5,
        )
        .expect("client should build");
        assert_eq!(
            client.series_index_url(),
            "https://o2tvseries.com/search/list_all_tv_series"
        );
    }

    #[test]
    fn retry_budget_never_drops_below_one() {
        let client =
            CatalogClient::new("o2tvseries.com".to_string(), Duration::from_secs(1), 0)
                .expect("client should build");
        assert_eq!(client.max_retries, 1);
    }
}
