use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;
use crate::errors::{O2tvError, Result};

/// how long a cached series listing stays usable.
pub const MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24);

/// on-disk shape of the series-listing cache.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogCache {
    /// write time, epoch milliseconds.
    pub time: u64,
    pub results: Vec<CatalogEntry>,
}

impl CatalogCache {
    pub fn new(results: Vec<CatalogEntry>, time: u64) -> Self {
        Self { time, results }
    }

    pub fn is_fresh(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.time) <= MAX_AGE.as_millis() as u64
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// loads the cached listing; a missing or stale file is a miss, not an
/// error, and triggers a fresh fetch upstream.
pub fn load(path: &Path) -> Result<Option<Vec<CatalogEntry>>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| O2tvError::Io {
        context: format!("reading cache file {}", path.display()),
        source,
    })?;

    let cache: CatalogCache =
        serde_json::from_str(&contents).map_err(|source| O2tvError::Json {
            context: format!("parsing cache file {}", path.display()),
            source,
        })?;

    if !cache.is_fresh(now_ms()) {
        tracing::info!("stale data found in cache, fetching new data");
        return Ok(None);
    }

    Ok(Some(cache.results))
}

pub fn store(path: &Path, results: &[CatalogEntry]) -> Result<()> {
    let cache = CatalogCache::new(results.to_vec(), now_ms());

    let contents = serde_json::to_string(&cache).map_err(|source| O2tvError::Json {
        context: format!("serializing cache file {}", path.display()),
        source,
    })?;

    fs::write(path, contents).map_err(|source| O2tvError::Io {
        context: format!("writing cache file {}", path.display()),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new("Lost", "/Lost/"),
            CatalogEntry::new("List", "/List/"),
        ]
    }

    #[test]
    fn freshness_flips_just_past_the_window() {
        let written_at = 1_000_000;
        let cache = CatalogCache::new(sample(), written_at);
        let max_age = MAX_AGE.as_millis() as u64;

        assert!(cache.is_fresh(written_at));
        assert!(cache.is_fresh(written_at + max_age));
        assert!(!cache.is_fresh(written_at + max_age + 1));
    }

    #[test]
    fn clock_regression_counts_as_fresh() {
        let cache = CatalogCache::new(sample(), 5_000);
        assert!(cache.is_fresh(0));
    }

    #[test]
    fn roundtrip_preserves_entry_order() {
        let cache = CatalogCache::new(sample(), 42);
        let json = serde_json::to_string(&cache).unwrap();
        let parsed: CatalogCache = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.time, 42);
        assert_eq!(parsed.results, sample());
    }

    #[test]
    fn unscored_entries_serialize_without_a_score_key() {
        let json = serde_json::to_string(&CatalogCache::new(sample(), 1)).unwrap();
        assert!(!json.contains("score"));
    }
}
