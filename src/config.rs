use std::ffi::OsString;

use clap::Parser;
use clap::error::ErrorKind;
use tracing::warn;

/// Audio/video offset applied to every stream, in nanoseconds.
pub const AV_OFFSET_NS: i64 = -1_000_000_000;

/// Seconds between UI refresh ticks.
pub const REFRESH_INTERVAL_SECS: u32 = 1;

#[derive(Parser, Debug, Clone)]
#[command(name = "viewer", about = "Play a single RTSP stream in a window")]
pub struct Config {
    /// Stream to play, e.g. rtsp://127.0.0.1:8554/test
    #[arg(long, env = "RTSP_URI")]
    pub uri: Option<String>,
}

impl Config {
    /// Reads `.env` from the working directory, if any, then the command line and environment.
    pub fn load() -> Result<Self, clap::Error> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                warn!("Could not read .env: {}", e);
            }
        }
        Self::load_from(std::env::args_os())
    }

    /// Parses without exiting the process, except for `--help` and `--version`.
    pub fn load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(config) => Ok(config),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => Err(e),
        }
    }

    /// The configured URI. Malformed values are reported but still handed to the pipeline.
    pub fn stream_uri(&self) -> Option<&str> {
        let uri = self.uri.as_deref()?;
        if let Err(e) = url::Url::parse(uri) {
            warn!("RTSP_URI {:?} does not look like a URI: {}", uri, e);
        }
        Some(uri)
    }
}
