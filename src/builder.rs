use std::time::Duration;

use crate::client::CatalogClient;
use crate::errors::Result;

const BASE_DOMAIN: &str = "o2tvseries.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_MAX_RETRIES: usize = 5;

pub struct O2tvBuilder {
    base_domain: String,
    timeout: Duration,
    max_retries: usize,
}

impl Default for O2tvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl O2tvBuilder {
    pub fn new() -> Self {
        Self {
            base_domain: BASE_DOMAIN.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// sets the base domain for the catalog.
    pub fn base_domain(mut self, domain: &str) -> Self {
        self.base_domain = domain.to_string();
        self
    }

    /// bounds every listing fetch attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// total attempts per listing fetch before giving up.
    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// builds a [`CatalogClient`] using the configured options.
    pub fn build(&self) -> Result<CatalogClient> {
        CatalogClient::new(self.base_domain.clone(), self.timeout, self.max_retries)
    }
}
