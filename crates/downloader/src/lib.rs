mod errors;
mod rotation;

use std::path::Path;
use std::time::{Duration, Instant};

pub use errors::{DownloaderError, Result};
use o2tv::transform::{SeriesOverrides, VideoFormat};
pub use rotation::MirrorRotation;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// pause between end-of-stream and closing the output handle; some file
/// servers keep trickling buffered bytes after the last chunk.
const CLOSE_GRACE: Duration = Duration::from_millis(1000);

/// one queued episode, described by the labels the catalog listed it under
/// and the numerals extracted from them.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub series: String,
    pub season: String,
    pub episode: String,
    pub season_num: String,
    pub episode_num: String,
    pub format: VideoFormat,
}

impl DownloadRequest {
    pub fn new(
        series: impl Into<String>,
        season: impl Into<String>,
        episode: impl Into<String>,
        season_num: impl Into<String>,
        episode_num: impl Into<String>,
        format: VideoFormat,
    ) -> Self {
        Self {
            series: series.into(),
            season: season.into(),
            episode: episode.into(),
            season_num: season_num.into(),
            episode_num: episode_num.into(),
            format,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DownloadEvent {
    Connecting {
        url: String,
        attempt: usize,
    },
    Started {
        filename: String,
        total_bytes: Option<u64>,
    },
    Progress {
        downloaded_bytes: u64,
        total_bytes: Option<u64>,
        elapsed: Duration,
    },
    Finished {
        downloaded_bytes: u64,
        elapsed: Duration,
    },
}

/// drives one episode at a time through connect, stream, and completion.
///
/// connection attempts rotate mirrors and transform strategies via
/// [`MirrorRotation`]; the stream phase appends chunks in arrival order and
/// only reports success once the byte count matches the advertised total.
pub struct DownloadEngine {
    client: reqwest::Client,
    overrides: SeriesOverrides,
    attempt_limit: Option<usize>,
}

/// two full mirror-id sweeps across both strategies.
const DEFAULT_ATTEMPT_LIMIT: usize = 28;

impl DownloadEngine {
    /// `timeout` bounds connecting and each body read, not the whole
    /// transfer; a long download must not be killed by a total deadline.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(DownloaderError::BuildClient)?;

        Ok(Self {
            client,
            overrides: SeriesOverrides::new(),
            attempt_limit: Some(DEFAULT_ATTEMPT_LIMIT),
        })
    }

    pub fn overrides(mut self, overrides: SeriesOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn attempt_limit(mut self, limit: usize) -> Self {
        self.attempt_limit = Some(limit.max(1));
        self
    }

    /// removes the total cap; rotation then retries across strategies
    /// until a server answers.
    pub fn unlimited(mut self) -> Self {
        self.attempt_limit = None;
        self
    }

    /// downloads one episode into the working directory, reporting progress
    /// through `on_event`. returns the filename written on success.
    pub async fn download(
        &self,
        request: &DownloadRequest,
        mut on_event: impl FnMut(DownloadEvent),
    ) -> Result<String> {
        let mut rotation = MirrorRotation::new();
        let mut attempts = 0usize;

        let (response, filename) = loop {
            if let Some(limit) = self.attempt_limit
                && attempts >= limit
            {
                return Err(DownloaderError::Exhausted { attempts });
            }

            attempts += 1;
            rotation.enqueue_candidates(request, &self.overrides);
            let candidate = rotation
                .next_candidate()
                .expect("queue holds candidates right after enqueue");

            on_event(DownloadEvent::Connecting {
                url: candidate.url.clone(),
                attempt: attempts,
            });

            match self.client.get(&candidate.url).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(url = %candidate.url, "file server accepted candidate");
                    rotation.clear_pending();
                    break (response, candidate.filename);
                }
                Ok(response) => {
                    tracing::info!(
                        status = %response.status(),
                        "couldn't connect to the server, retrying"
                    );
                }
                Err(err) => {
                    tracing::info!(error = %err, "couldn't connect to the server, retrying");
                }
            }
        };

        let total = response.content_length();
        on_event(DownloadEvent::Started {
            filename: filename.clone(),
            total_bytes: total,
        });

        let (downloaded, elapsed) = self
            .stream_to_disk(response, &filename, total, &mut on_event)
            .await?;

        if let Some(total) = total
            && downloaded < total
        {
            return Err(DownloaderError::Incomplete { downloaded, total });
        }

        on_event(DownloadEvent::Finished {
            downloaded_bytes: downloaded,
            elapsed,
        });

        Ok(filename)
    }

    /// consumes the body chunk-by-chunk, appending in arrival order. a
    /// leftover file of the same name is removed first so a stale partial
    /// never mixes with fresh data.
    async fn stream_to_disk(
        &self,
        mut response: reqwest::Response,
        filename: &str,
        total: Option<u64>,
        on_event: &mut impl FnMut(DownloadEvent),
    ) -> Result<(u64, Duration)> {
        if Path::new(filename).exists() {
            tokio::fs::remove_file(filename)
                .await
                .map_err(|source| DownloaderError::Io {
                    context: format!("removing stale file {filename}"),
                    source,
                })?;
        }

        let mut file = File::create(filename)
            .await
            .map_err(|source| DownloaderError::Io {
                context: format!("creating output file {filename}"),
                source,
            })?;

        let started = Instant::now();
        let mut downloaded = 0u64;

        loop {
            let chunk = response
                .chunk()
                .await
                .map_err(|source| DownloaderError::Request {
                    context: format!("reading stream for {filename}"),
                    source,
                })?;

            let Some(chunk) = chunk else {
                break;
            };

            downloaded += chunk.len() as u64;
            file.write_all(&chunk)
                .await
                .map_err(|source| DownloaderError::Io {
                    context: format!("writing output file {filename}"),
                    source,
                })?;

            on_event(DownloadEvent::Progress {
                downloaded_bytes: downloaded,
                total_bytes: total,
                elapsed: started.elapsed(),
            });
        }

        tokio::time::sleep(CLOSE_GRACE).await;

        file.flush()
            .await
            .map_err(|source| DownloaderError::Io {
                context: format!("flushing output file {filename}"),
                source,
            })?;
        drop(file);

        tracing::info!("connection to server has closed");

        Ok((downloaded, started.elapsed()))
    }
}
