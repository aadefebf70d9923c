use clap::Parser;

use o2tv::transform::VideoFormat;

#[derive(Debug, Parser)]
#[command(author, version, about = "search the O2TvSeries catalog and download episodes")]
pub struct Cli {
    /// Series to search for; leave empty to browse the full catalog
    pub query: Option<String>,

    /// How long a request may take, in seconds
    #[arg(short, long, default_value_t = 60)]
    pub timeout: u64,

    /// The video format (mp4, 3gp, mp3, HD)
    #[arg(short, long, default_value = "mp4")]
    pub format: VideoFormat,

    /// Logging verbosity (error, warn, info, debug)
    #[arg(long, default_value = "info", env = "O2TV_LOG")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_surface() {
        let cli = Cli::parse_from(["o2tv"]);
        assert!(cli.query.is_none());
        assert_eq!(cli.timeout, 60);
        assert_eq!(cli.format, VideoFormat::Mp4);
    }

    #[test]
    fn positional_query_and_flags_parse() {
        let cli = Cli::parse_from(["o2tv", "lost", "--timeout", "10", "--format", "HD"]);
        assert_eq!(cli.query.as_deref(), Some("lost"));
        assert_eq!(cli.timeout, 10);
        assert_eq!(cli.format, VideoFormat::Hd);
    }
}
