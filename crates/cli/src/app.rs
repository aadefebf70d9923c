use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use owo_colors::OwoColorize;

use o2tv::cache;
use o2tv::prelude::*;
use o2tv::rank::rank;
use o2tv_downloader::{DownloadEngine, DownloadRequest};

use crate::args::Cli;
use crate::constants::CACHE_FILE;
use crate::logger::{CliLogger, LogLevel, init_tracing};
use crate::progress::DownloadProgressRenderer;
use crate::prompt::{select_entry, select_episodes};

pub struct App {
    cli: Cli,
    logger: Arc<CliLogger>,
}

impl App {
    pub fn new() -> Self {
        let cli = Cli::parse();
        let logger = Arc::new(CliLogger::new(&cli.log_level));
        init_tracing(Arc::clone(&logger));
        Self { cli, logger }
    }

    /// runs the whole pipeline and maps the outcome to a process exit code.
    pub async fn run(&self) -> i32 {
        match self.pipeline().await {
            Ok(()) => 0,
            Err(err) => {
                self.logger
                    .failed(format!("an error occured. details:\n{err}"));
                1
            }
        }
    }

    async fn pipeline(&self) -> Result<()> {
        let timeout = Duration::from_secs(self.cli.timeout);
        let mut session = SearchSession::new(
            self.cli.query.clone().unwrap_or_default(),
            self.cli.format,
            timeout,
        );

        self.logger.loading("initializing");
        let client = O2tvBuilder::new().timeout(timeout).build()?;
        self.logger.success("initialized");

        let catalog = self.load_catalog(&client).await?;

        let candidates = rank(catalog, &session.series);
        if candidates.is_empty() {
            return Err(O2tvError::NoEntries);
        }

        let series = select_entry(
            &format!("{} series found. Pick one:", candidates.len()),
            &candidates,
        )?;
        session.choose_series(&series.label);

        let seasons = self
            .logger
            .while_loading(
                format!("fetching available seasons of {}", series.label.yellow()),
                client.fetch_listing(&series.link),
            )
            .await?;
        if seasons.is_empty() {
            return Err(O2tvError::NoEntries);
        }

        let season = select_entry(
            &format!("{} seasons found. Pick one:", seasons.len()),
            &seasons,
        )?;
        session.choose_season(&season.label);

        let episodes = self
            .logger
            .while_loading(
                format!("fetching available episodes of {}", season.label.yellow()),
                client.fetch_listing(&season.link),
            )
            .await?;
        if episodes.is_empty() {
            return Err(O2tvError::NoEntries);
        }

        session.queue_episodes(select_episodes(&self.logger, &episodes)?);

        self.download_queue(&mut session).await
    }

    /// cached series listing when fresh, otherwise a fetch that refills the
    /// cache for the next day of runs.
    async fn load_catalog(&self, client: &CatalogClient) -> Result<Vec<CatalogEntry>> {
        let cache_path = Path::new(CACHE_FILE);

        match cache::load(cache_path) {
            Ok(Some(results)) => return Ok(results),
            Ok(None) => {}
            // an unreadable cache is a miss, same as a stale one
            Err(err) => self
                .logger
                .debug("cache", format!("ignoring unreadable cache: {err}")),
        }

        let results = self
            .logger
            .while_loading("fetching series", client.fetch_series_index())
            .await?;
        cache::store(cache_path, &results)?;

        Ok(results)
    }

    async fn download_queue(&self, session: &mut SearchSession) -> Result<()> {
        let mut overrides = SeriesOverrides::new();
        // the file servers store this one without its apostrophe
        overrides.register("grey's anatomy", |filename, _| filename.replace('\'', ""));

        let engine = DownloadEngine::new(session.timeout)
            .map_err(|err| O2tvError::Message(format!("download setup failed: {err}")))?
            .overrides(overrides);

        self.logger.info("connecting to file server...");
        self.logger
            .warn("it may take long to start the download. quit the program whenever you feel like");

        while let Some(episode) = session.next_episode() {
            self.download_episode(&engine, session, &episode).await?;
        }

        self.logger.success("download successful");
        Ok(())
    }

    async fn download_episode(
        &self,
        engine: &DownloadEngine,
        session: &SearchSession,
        episode: &CatalogEntry,
    ) -> Result<()> {
        let season_num = first_num(&session.season).ok_or_else(|| {
            O2tvError::Message(format!("no season number in {:?}", session.season))
        })?;
        let episode_num = first_num(&episode.label).ok_or_else(|| {
            O2tvError::Message(format!("no episode number in {:?}", episode.label))
        })?;

        let request = DownloadRequest::new(
            session.series.clone(),
            session.season.clone(),
            episode.label.clone(),
            season_num,
            episode_num,
            session.format,
        );

        self.logger.info(format!(
            "downloading {} --> {}",
            episode.label.yellow(),
            std::env::current_dir()
                .map(|dir| dir.display().to_string())
                .unwrap_or_else(|_| ".".to_string())
        ));

        let mut renderer = DownloadProgressRenderer::new(self.logger.level >= LogLevel::Info);
        let (events_tx, mut events_rx) = tokio::sync::mpsc::unbounded_channel();
        let mut tick = tokio::time::interval(Duration::from_millis(80));
        let mut download_fut = std::pin::pin!(engine.download(&request, move |event| {
            let _ = events_tx.send(event);
        }));

        let download_result = loop {
            tokio::select! {
                result = &mut download_fut => break result,
                maybe_event = events_rx.recv() => {
                    if let Some(event) = maybe_event {
                        renderer.handle(event);
                    }
                }
                _ = tick.tick() => {
                    renderer.tick();
                }
            }
        };

        while let Ok(event) = events_rx.try_recv() {
            renderer.handle(event);
        }

        let filename = download_result
            .map_err(|err| O2tvError::Message(format!("download failed: {err}")))?;
        self.logger.success(format!("done {}", filename.yellow()));

        Ok(())
    }
}
