use std::collections::VecDeque;
use std::time::Duration;

use crate::catalog::CatalogEntry;
use crate::transform::VideoFormat;

/// pipeline state threaded explicitly through every selection step.
///
/// one owned instance per run; each prompt mutates exactly one field, and
/// queued episodes are consumed strictly front-to-back by the download
/// loop.
#[derive(Debug)]
pub struct SearchSession {
    /// lowercased search query, replaced by the chosen series label.
    pub series: String,
    pub season: String,
    episodes: VecDeque<CatalogEntry>,
    pub format: VideoFormat,
    pub timeout: Duration,
}

impl SearchSession {
    pub fn new(query: String, format: VideoFormat, timeout: Duration) -> Self {
        Self {
            series: query.to_lowercase(),
            season: String::new(),
            episodes: VecDeque::new(),
            format,
            timeout,
        }
    }

    pub fn choose_series(&mut self, label: &str) {
        self.series = label.to_string();
    }

    pub fn choose_season(&mut self, label: &str) {
        self.season = label.to_string();
    }

    pub fn queue_episodes(&mut self, episodes: Vec<CatalogEntry>) {
        self.episodes = episodes.into();
    }

    pub fn queued_episodes(&self) -> usize {
        self.episodes.len()
    }

    /// next queued episode, in selection order.
    pub fn next_episode(&mut self) -> Option<CatalogEntry> {
        self.episodes.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_lowercased_on_entry() {
        let session = SearchSession::new("LoSt".into(), VideoFormat::Mp4, Duration::from_secs(60));
        assert_eq!(session.series, "lost");
    }

    #[test]
    fn episodes_drain_front_to_back() {
        let mut session =
            SearchSession::new("lost".into(), VideoFormat::Mp4, Duration::from_secs(60));
        session.queue_episodes(vec![
            CatalogEntry::new("Episode 01", "/e1"),
            CatalogEntry::new("Episode 02", "/e2"),
        ]);

        assert_eq!(session.queued_episodes(), 2);
        assert_eq!(session.next_episode().unwrap().label, "Episode 01");
        assert_eq!(session.next_episode().unwrap().label, "Episode 02");
        assert!(session.next_episode().is_none());
    }
}
