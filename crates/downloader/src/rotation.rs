use std::collections::VecDeque;

use o2tv::transform::{
    DownloadCandidate, MIRROR_HOSTS, MirrorHost, REPO_LABELS, SeriesOverrides, TransformContext,
};

use crate::DownloadRequest;

/// attempts a strategy gets before rotation advances past it.
const STRATEGY_RETRY_LIMIT: u32 = 7;

/// mirror hosts start at d2; ids sweep [2..8] per strategy.
const MIRROR_ID_OFFSET: u32 = 2;

struct StrategyState {
    host: MirrorHost,
    retry_count: u32,
}

/// sequential mirror/strategy rotation for one download.
///
/// each generation stamps the current mirror id into one candidate per repo
/// brand and advances the strategy's retry counter; a spent counter resets
/// and rotation wraps to the next strategy. pending candidates survive
/// failed attempts and are only discarded once a connection succeeds.
pub struct MirrorRotation {
    strategies: Vec<StrategyState>,
    current: usize,
    queue: VecDeque<DownloadCandidate>,
}

impl Default for MirrorRotation {
    fn default() -> Self {
        Self::new()
    }
}

impl MirrorRotation {
    pub fn new() -> Self {
        Self {
            strategies: MIRROR_HOSTS
                .iter()
                .map(|host| StrategyState {
                    host: *host,
                    retry_count: 0,
                })
                .collect(),
            current: 0,
            queue: VecDeque::new(),
        }
    }

    pub fn current_host(&self) -> MirrorHost {
        self.strategies[self.current].host
    }

    pub fn current_retry_count(&self) -> u32 {
        self.strategies[self.current].retry_count
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// generates one candidate per repo brand from the current strategy and
    /// queues them behind whatever earlier attempts left pending.
    pub fn enqueue_candidates(&mut self, request: &DownloadRequest, overrides: &SeriesOverrides) {
        let state = &mut self.strategies[self.current];
        let host = state.host;
        let mirror_id = state.retry_count + MIRROR_ID_OFFSET;

        state.retry_count += 1;
        let rotate = state.retry_count >= STRATEGY_RETRY_LIMIT;
        if rotate {
            state.retry_count = 0;
        }

        for repo in REPO_LABELS {
            let ctx = TransformContext {
                mirror_id,
                repo,
                series: &request.series,
                season: &request.season,
                episode: &request.episode,
                season_num: &request.season_num,
                episode_num: &request.episode_num,
                format: request.format,
            };
            self.queue.push_back(host.candidate(&ctx, overrides));
        }

        if rotate {
            self.current = (self.current + 1) % self.strategies.len();
        }
    }

    pub fn next_candidate(&mut self) -> Option<DownloadCandidate> {
        self.queue.pop_front()
    }

    /// drops every queued candidate; called once a connection succeeds.
    pub fn clear_pending(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use o2tv::transform::VideoFormat;

    fn request() -> DownloadRequest {
        DownloadRequest::new("Lost", "Season 01", "Episode 09", "01", "09", VideoFormat::Mp4)
    }

    fn mirror_id_of(url: &str) -> u32 {
        let tail = url.strip_prefix("http://d").expect("mirror url shape");
        tail.split('.')
            .next()
            .and_then(|id| id.parse().ok())
            .expect("mirror id digit")
    }

    #[test]
    fn seven_failures_sweep_ids_then_rotate_with_a_reset_counter() {
        let overrides = SeriesOverrides::new();
        let mut rotation = MirrorRotation::new();
        let mut ids = Vec::new();

        for _ in 0..7 {
            assert_eq!(rotation.current_host(), MirrorHost::Club);
            rotation.enqueue_candidates(&request(), &overrides);

            let first = rotation.next_candidate().unwrap();
            let second = rotation.next_candidate().unwrap();
            assert_eq!(mirror_id_of(&first.url), mirror_id_of(&second.url));
            ids.push(mirror_id_of(&first.url));
        }

        assert_eq!(ids, vec![2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(rotation.current_host(), MirrorHost::Com);
        assert_eq!(rotation.current_retry_count(), 0);
    }

    #[test]
    fn rotation_wraps_back_to_the_first_strategy() {
        let overrides = SeriesOverrides::new();
        let mut rotation = MirrorRotation::new();

        for _ in 0..14 {
            rotation.enqueue_candidates(&request(), &overrides);
            rotation.clear_pending();
        }

        assert_eq!(rotation.current_host(), MirrorHost::Club);
        assert_eq!(rotation.current_retry_count(), 0);
    }

    #[test]
    fn each_batch_carries_one_candidate_per_repo_brand() {
        let overrides = SeriesOverrides::new();
        let mut rotation = MirrorRotation::new();
        rotation.enqueue_candidates(&request(), &overrides);

        let first = rotation.next_candidate().unwrap();
        let second = rotation.next_candidate().unwrap();

        assert!(first.filename.contains("(TvShows4Mobile.Com)"));
        assert!(second.filename.contains("(O2TvSeries.Com)"));
        assert!(first.url.contains("o2tvseries.club"));
        assert!(first.filename.contains(" qvlma."));
        assert!(rotation.next_candidate().is_none());
    }

    #[test]
    fn pending_candidates_survive_a_failed_attempt() {
        let overrides = SeriesOverrides::new();
        let mut rotation = MirrorRotation::new();

        rotation.enqueue_candidates(&request(), &overrides);
        let first = rotation.next_candidate().unwrap();
        assert_eq!(rotation.pending(), 1);

        // next attempt queues a fresh pair behind the leftover brand
        rotation.enqueue_candidates(&request(), &overrides);
        assert_eq!(rotation.pending(), 3);

        let leftover = rotation.next_candidate().unwrap();
        assert_eq!(mirror_id_of(&leftover.url), mirror_id_of(&first.url));
        assert!(leftover.filename.contains("(O2TvSeries.Com)"));
    }

    #[test]
    fn success_discards_every_queued_candidate() {
        let overrides = SeriesOverrides::new();
        let mut rotation = MirrorRotation::new();

        rotation.enqueue_candidates(&request(), &overrides);
        rotation.enqueue_candidates(&request(), &overrides);
        assert_eq!(rotation.pending(), 4);

        rotation.clear_pending();
        assert_eq!(rotation.pending(), 0);
        assert!(rotation.next_candidate().is_none());
    }

    #[test]
    fn com_strategy_serves_after_club_rotates_out() {
        let overrides = SeriesOverrides::new();
        let mut rotation = MirrorRotation::new();

        for _ in 0..7 {
            rotation.enqueue_candidates(&request(), &overrides);
            rotation.clear_pending();
        }

        rotation.enqueue_candidates(&request(), &overrides);
        let candidate = rotation.next_candidate().unwrap();
        assert!(candidate.url.contains("o2tvseries.com"));
        assert!(!candidate.filename.contains("qvlma"));
        assert_eq!(mirror_id_of(&candidate.url), 2);
    }
}
