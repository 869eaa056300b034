//! Configuration for the archgraph importer and its logging.
//!
//! Configuration is read from TOML:
//!
//! ```toml
//! [import]
//! resolve_missing_dependencies = true
//! max_resolution_iterations = 5
//! parallel = true
//! threads = 4
//!
//! [logging]
//! level = "archgraph=debug"
//! json = false
//! ```

use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod diagnostics;

pub use diagnostics::{ConfigDiagnostics, ConfigWarning};

/// Prefix of every `tracing` target used by the archgraph crates.
pub const LOG_TARGET: &str = "archgraph";

/// Top-level config.
///
/// Unknown keys do not fail loading: they are logged and returned in
/// [`ConfigDiagnostics::unknown_keys`]. The JSON schema still rejects them, so editors flag typos.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct ArchgraphConfig {
    /// Import session behaviour.
    #[serde(default)]
    pub import: ImportConfig,

    /// Global logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct ImportConfig {
    /// Ask the configured class resolver for classes that are still stubs once the explicitly
    /// imported classes are done.
    #[serde(default)]
    pub resolve_missing_dependencies: bool,

    /// Upper bound on dependency-resolution rounds. Each round may surface new stubs.
    #[serde(default = "ImportConfig::default_max_resolution_iterations")]
    pub max_resolution_iterations: u32,

    /// Import classes on a worker pool instead of the calling thread.
    #[serde(default = "ImportConfig::default_parallel")]
    pub parallel: bool,

    /// Worker count. Defaults to the available parallelism.
    #[serde(default)]
    #[schemars(range(min = 1))]
    pub threads: Option<usize>,
}

impl ImportConfig {
    fn default_max_resolution_iterations() -> u32 {
        5
    }

    fn default_parallel() -> bool {
        true
    }

    pub fn effective_threads(&self) -> usize {
        match self.threads {
            Some(threads) if threads > 0 => threads,
            _ => std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            resolve_missing_dependencies: false,
            max_resolution_iterations: Self::default_max_resolution_iterations(),
            parallel: Self::default_parallel(),
            threads: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level for all archgraph crates: a simple level (`info`, `debug`, ...) or a full
    /// `tracing_subscriber::EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Mirror logs to stderr.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Append logs to the given file path. If the file cannot be opened, file logging is
    /// disabled while other sinks remain active.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    /// `level` as an `EnvFilter` directive string. A bare level (`debug`, `WARNING`, ...) is
    /// scoped to the `archgraph` targets; anything else is used as written.
    pub fn filter_directives(&self) -> String {
        let level = self.level.trim();
        if level.is_empty() {
            return format!("{LOG_TARGET}=info");
        }
        let alias = if level.eq_ignore_ascii_case("warning") {
            "warn"
        } else {
            level
        };
        match alias.parse::<LevelFilter>() {
            Ok(filter) => format!("{LOG_TARGET}={}", filter.to_string().to_ascii_lowercase()),
            Err(_) => level.to_owned(),
        }
    }

    /// The subscriber filter. Directives that do not parse are dropped; with none left,
    /// everything at `info` and above is kept.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .parse_lossy(self.filter_directives())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
            file: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` includes a source snippet; keep only the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl ArchgraphConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::load_from_path_with_diagnostics(path)?.0)
    }

    /// Load a config file from TOML and return diagnostics (unknown keys and suspicious values).
    pub fn load_from_path_with_diagnostics(
        path: impl AsRef<Path>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str_with_diagnostics(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(Self::load_from_str_with_diagnostics(text)?.0)
    }

    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<ArchgraphConfig>(text)?;
        for key in &unknown_keys {
            tracing::warn!(target: "archgraph.config", key = %key, "unknown config key");
        }
        let diagnostics = ConfigDiagnostics {
            unknown_keys,
            warnings: config.validate(),
        };
        Ok((config, diagnostics))
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        if self.import.threads == Some(0) {
            warnings.push(ConfigWarning::ZeroThreads);
        }
        if self.import.resolve_missing_dependencies && self.import.max_resolution_iterations == 0 {
            warnings.push(ConfigWarning::ResolutionWithoutIterations);
        }
        if EnvFilter::try_new(self.logging.filter_directives()).is_err() {
            warnings.push(ConfigWarning::InvalidValue {
                toml_path: "logging.level".to_string(),
                message: "not a valid log level or filter directive; falling back to `info`"
                    .to_string(),
            });
        }
        warnings
    }
}

/// JSON schema for the config file, for editor tooling.
#[must_use]
pub fn json_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(ArchgraphConfig)
}

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber described by `config`.
///
/// Safe to call multiple times; only the first call installs a subscriber.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let file = config.file.as_ref().and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });
        let file_open_failed = config.file.is_some() && file.is_none();

        let mut make_writer = BoxMakeWriter::new(io::sink);
        if config.stderr {
            // `cargo test` output capture only works for the stdlib's print macros.
            if cfg!(debug_assertions) {
                make_writer = BoxMakeWriter::new(
                    make_writer.and(tracing_subscriber::fmt::writer::TestWriter::with_stderr),
                );
            } else {
                make_writer = BoxMakeWriter::new(make_writer.and(io::stderr));
            }
        }
        if let Some(file) = file {
            // `&File` writes are appends; each event is written in one call.
            make_writer = BoxMakeWriter::new(make_writer.and(Arc::new(file)));
        }

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_ok() && file_open_failed {
            if let Some(path) = config.file.as_ref() {
                tracing::warn!(
                    target: "archgraph.config",
                    path = %path.display(),
                    "failed to open log file; file logging disabled"
                );
            }
        }
    });
}
