use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use utils::version;

use crate::fetcher::FetcherConfig;
use crate::metrics::prefix::resolve_prefix;

/// Dotenv file read before anything else when `--env-file` is not given
pub const DEFAULT_ENV_FILE: &str = "/var/www/calling-chime-mackerel-plugin/.env";

/// Environment variable holding the fallback metric key prefix
pub const LABEL_ENV: &str = "LABEL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Args(#[from] clap::Error),
    #[error("failed to load env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },
    #[error("no upstream URL configured, set URL or pass --url")]
    MissingUrl,
}

#[derive(Parser, Debug, Clone)]
#[command(about, long_about, version = &**version::VERSION)]
pub struct Cli {
    #[arg(
        long,
        env = "URL",
        help = "Sessions endpoint to poll, e.g. https://chime.example.com/api/sessions"
    )]
    pub url: Option<String>,

    #[arg(
        long,
        help = "Metric key prefix, falls back to the LABEL environment variable"
    )]
    pub metric_key_prefix: Option<String>,

    #[arg(
        long,
        value_hint = clap::ValueHint::FilePath,
        help = "File keeping the last emitted values"
    )]
    pub tempfile: Option<PathBuf>,

    #[arg(
        long,
        env = "CHIME_PROBE_ENV_FILE",
        value_hint = clap::ValueHint::FilePath,
        default_value = DEFAULT_ENV_FILE,
        help = "Dotenv file loaded before reading URL and LABEL"
    )]
    pub env_file: PathBuf,

    #[arg(long, help = "Do not load any dotenv file")]
    pub skip_env_file: bool,

    #[arg(
        long,
        env = "CHIME_PROBE_METRICS_FORMAT",
        default_value = "plugin",
        help = "Output format, either 'plugin' or 'json'"
    )]
    pub metrics_format: String,

    #[arg(
        long,
        help = "HTTP timeout in seconds, unset waits on the upstream indefinitely"
    )]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    /// Parse `args`, load the configured dotenv file, then parse again so
    /// values from the file act as environment fallbacks.
    ///
    /// Variables already present in the process environment are not
    /// overridden by the file.
    pub fn parse_with_env_file<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let first = Self::try_parse_from(&args)?;
        if first.skip_env_file {
            return Ok(first);
        }

        load_env_file(&first.env_file)?;
        Ok(Self::try_parse_from(&args)?)
    }

    /// Resolve the metric key prefix against the `LABEL` fallback.
    pub fn metric_key_prefix(&self, label: Option<&str>) -> String {
        resolve_prefix(self.metric_key_prefix.as_deref(), label)
    }

    pub fn fetcher_config(&self) -> Result<FetcherConfig, ConfigError> {
        let url = self
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingUrl)?;

        Ok(FetcherConfig {
            url: url.to_string(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }
}

pub fn load_env_file(path: &Path) -> Result<(), ConfigError> {
    dotenv::from_path(path).map_err(|source| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded env file");
    Ok(())
}
