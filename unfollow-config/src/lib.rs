//! Loader for account credentials and run settings.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults,
//! 2. entries of a `.env` file (required; parsed, never exported),
//! 3. the process environment: `TWITTER_*` for secrets and `UNFOLLOW_*` for
//!    tuning knobs such as `UNFOLLOW_MAX_PAGES`.
//!
//! The result is a plain [`Settings`] value built once at startup and handed
//! to whatever constructs the API client.
use config::{Config, ConfigBuilder, Environment, builder::DefaultState};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_API_URL: &str = "https://api.twitter.com";
const DEFAULT_TIMEOUT_SECS: i64 = 15;
const DEFAULT_MAX_PAGES: i64 = 1000;

const SECRET_PREFIX: &str = "TWITTER";
const TUNING_PREFIX: &str = "UNFOLLOW";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load env file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
    #[error("missing required secret {0}")]
    MissingSecret(&'static str),
    #[error("invalid setting {key}: {message}")]
    Invalid { key: &'static str, message: String },
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

/// The four OAuth 1.0a secrets for a single account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &"<redacted>")
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    /// Base URL of the REST API; overridden in tests to point at a mock.
    pub api_url: String,
    pub timeout_secs: u64,
    /// Iteration guard for each paginated collection.
    pub max_pages: usize,
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// Flat shape of the merged sources; secrets stay optional so a missing one
// can be reported by its variable name.
#[derive(Deserialize)]
struct RawSettings {
    consumer_key: Option<String>,
    consumer_secret: Option<String>,
    access_token: Option<String>,
    access_secret: Option<String>,
    api_url: String,
    timeout_secs: u64,
    max_pages: usize,
}

fn require(value: Option<String>, var: &'static str) -> Result<String, SettingsError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(SettingsError::MissingSecret(var)),
    }
}

impl TryFrom<RawSettings> for Settings {
    type Error = SettingsError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        let credentials = Credentials {
            consumer_key: require(raw.consumer_key, "TWITTER_CONSUMER_KEY")?,
            consumer_secret: require(raw.consumer_secret, "TWITTER_CONSUMER_SECRET")?,
            access_token: require(raw.access_token, "TWITTER_ACCESS_TOKEN")?,
            access_secret: require(raw.access_secret, "TWITTER_ACCESS_SECRET")?,
        };
        if raw.api_url.trim().is_empty() {
            return Err(SettingsError::Invalid {
                key: "api_url",
                message: "must not be empty".into(),
            });
        }
        if raw.timeout_secs == 0 {
            return Err(SettingsError::Invalid {
                key: "timeout_secs",
                message: "must be at least 1".into(),
            });
        }
        if raw.max_pages == 0 {
            return Err(SettingsError::Invalid {
                key: "max_pages",
                message: "must be at least 1".into(),
            });
        }
        Ok(Settings {
            credentials,
            api_url: raw.api_url.trim().to_string(),
            timeout_secs: raw.timeout_secs,
            max_pages: raw.max_pages,
        })
    }
}

/// Map an env-style key (`TWITTER_CONSUMER_KEY`) to its settings key
/// (`consumer_key`). Keys without a known prefix are ignored.
fn settings_key(env_key: &str) -> Option<String> {
    [SECRET_PREFIX, TUNING_PREFIX].iter().find_map(|prefix| {
        env_key
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('_'))
            .filter(|rest| !rest.is_empty())
            .map(str::to_ascii_lowercase)
    })
}

enum EnvFileSource {
    Path(PathBuf),
    Inline(String),
}

/// Builder hides the `config` crate wiring (defaults + `.env` + environment).
pub struct SettingsLoader {
    env_file: Option<EnvFileSource>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    /// Start from `./.env` plus the process environment.
    pub fn new() -> Self {
        Self {
            env_file: Some(EnvFileSource::Path(PathBuf::from(DEFAULT_ENV_FILE))),
        }
    }

    /// Read secrets from a different `.env` file. The file is required.
    pub fn with_env_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.env_file = Some(EnvFileSource::Path(path.as_ref().to_path_buf()));
        self
    }

    /// Use inline `.env` contents instead of a file.
    ///
    /// ```
    /// use unfollow_config::SettingsLoader;
    ///
    /// let settings = SettingsLoader::new()
    ///     .with_env_str(
    ///         "TWITTER_CONSUMER_KEY=ck\n\
    ///          TWITTER_CONSUMER_SECRET=cs\n\
    ///          TWITTER_ACCESS_TOKEN=at\n\
    ///          TWITTER_ACCESS_SECRET=as\n\
    ///          UNFOLLOW_MAX_PAGES=7\n",
    ///     )
    ///     .load()
    ///     .expect("valid settings");
    ///
    /// assert_eq!(settings.max_pages, 7);
    /// assert_eq!(settings.api_url, "https://api.twitter.com");
    /// ```
    pub fn with_env_str(mut self, contents: &str) -> Self {
        self.env_file = Some(EnvFileSource::Inline(contents.to_string()));
        self
    }

    /// Skip the `.env` file entirely and rely on the process environment.
    pub fn without_env_file(mut self) -> Self {
        self.env_file = None;
        self
    }

    /// Merge every source and validate the result.
    pub fn load(self) -> Result<Settings, SettingsError> {
        let mut builder: ConfigBuilder<DefaultState> = Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("max_pages", DEFAULT_MAX_PAGES)?;

        for (key, value) in self.read_env_file()? {
            if let Some(key) = settings_key(&key) {
                builder = builder.set_default(key, value)?;
            }
        }

        let cfg = builder
            .add_source(Environment::with_prefix(SECRET_PREFIX))
            .add_source(Environment::with_prefix(TUNING_PREFIX))
            .build()?;

        let raw: RawSettings = cfg.try_deserialize()?;
        Settings::try_from(raw)
    }

    fn read_env_file(&self) -> Result<Vec<(String, String)>, SettingsError> {
        match &self.env_file {
            None => Ok(Vec::new()),
            Some(EnvFileSource::Path(path)) => {
                let wrap = |source| SettingsError::EnvFile {
                    path: path.clone(),
                    source,
                };
                dotenvy::from_path_iter(path)
                    .map_err(wrap)?
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(wrap)
            }
            Some(EnvFileSource::Inline(contents)) => dotenvy::from_read_iter(contents.as_bytes())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| SettingsError::EnvFile {
                    path: PathBuf::from("<inline>"),
                    source,
                }),
        }
    }
}
