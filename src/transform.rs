use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::O2tvError;

/// video format accepted on the command line.
///
/// `Hd` is a marker format: the file keeps the `.mp4` extension and the
/// filename carries an ` HD` token before the bracketed repo label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoFormat {
    Mp4,
    ThreeGp,
    Mp3,
    Hd,
}

impl VideoFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 | Self::Hd => "mp4",
            Self::ThreeGp => "3gp",
            Self::Mp3 => "mp3",
        }
    }

    pub fn is_hd(&self) -> bool {
        matches!(self, Self::Hd)
    }
}

impl FromStr for VideoFormat {
    type Err = O2tvError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mp4" => Ok(Self::Mp4),
            "3gp" => Ok(Self::ThreeGp),
            "mp3" => Ok(Self::Mp3),
            "hd" => Ok(Self::Hd),
            _ => Err(O2tvError::UnknownFormat(raw.to_string())),
        }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Mp4 => "mp4",
            Self::ThreeGp => "3gp",
            Self::Mp3 => "mp3",
            Self::Hd => "HD",
        };
        write!(f, "{text}")
    }
}

/// the two source-site brand strings embedded in real filenames.
pub const REPO_LABELS: [&str; 2] = ["TvShows4Mobile.Com", "O2TvSeries.Com"];

/// everything a strategy needs to shape one candidate.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    pub mirror_id: u32,
    pub repo: &'a str,
    pub series: &'a str,
    pub season: &'a str,
    pub episode: &'a str,
    pub season_num: &'a str,
    pub episode_num: &'a str,
    pub format: VideoFormat,
}

/// a (url, filename) pair produced by one strategy for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadCandidate {
    pub url: String,
    pub filename: String,
}

/// one mirror's naming convention. strategies are tried in declaration
/// order, rotating when a strategy's retry budget is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorHost {
    Club,
    Com,
}

pub const MIRROR_HOSTS: [MirrorHost; 2] = [MirrorHost::Club, MirrorHost::Com];

impl MirrorHost {
    pub fn domain(&self) -> &'static str {
        match self {
            Self::Club => "o2tvseries.club",
            Self::Com => "o2tvseries.com",
        }
    }

    /// extra filename token some mirrors require before the extension.
    fn filename_suffix(&self) -> &'static str {
        match self {
            Self::Club => " qvlma",
            Self::Com => "",
        }
    }

    pub fn candidate(
        &self,
        ctx: &TransformContext<'_>,
        overrides: &SeriesOverrides,
    ) -> DownloadCandidate {
        let mut filename = if ctx.format.is_hd() {
            format!(
                "{} - S{}E{} HD ({})",
                ctx.series, ctx.season_num, ctx.episode_num, ctx.repo
            )
        } else {
            format!(
                "{} - S{}E{} ({})",
                ctx.series, ctx.season_num, ctx.episode_num, ctx.repo
            )
        };

        filename = overrides.apply(ctx.series, filename, ctx);
        filename.push_str(self.filename_suffix());
        filename.push('.');
        filename.push_str(ctx.format.extension());

        let url = format!(
            "http://d{}.{}/{}/{}/{}",
            ctx.mirror_id,
            self.domain(),
            ctx.series,
            ctx.season,
            filename
        );

        DownloadCandidate { url, filename }
    }
}

type OverrideFn = Box<dyn Fn(String, &TransformContext<'_>) -> String + Send + Sync>;

/// per-series filename fixups, keyed by lowercased series name.
///
/// a few shows are stored under names that differ from their listing label;
/// the override runs against the generated filename before the mirror
/// suffix and extension are appended.
#[derive(Default)]
pub struct SeriesOverrides {
    table: HashMap<String, OverrideFn>,
}

impl SeriesOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        series: impl Into<String>,
        transform: impl Fn(String, &TransformContext<'_>) -> String + Send + Sync + 'static,
    ) {
        self.table
            .insert(series.into().to_lowercase(), Box::new(transform));
    }

    pub fn apply(&self, series: &str, filename: String, ctx: &TransformContext<'_>) -> String {
        match self.table.get(&series.to_lowercase()) {
            Some(transform) => transform(filename, ctx),
            None => filename,
        }
    }
}

impl fmt::Debug for SeriesOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeriesOverrides")
            .field("series", &self.table.keys().collect::<Vec<_>>())
            .finish()
    }
}
