//! # Logger
//!
//! Installs the global `tracing` subscriber for the data library binaries: a compact
//! console layer, an optional non-blocking rolling file layer (plain or JSON), and an
//! env filter seeded from the configured level.
//!
//! Unless `RUST_LOG` or an explicit filter says otherwise, the HTTP client stack
//! (`hyper`, `reqwest`, `rustls`, `h2`) is capped at `warn` so upstream chatter does not
//! drown request logs.
//!
//! ## Example
//!
//! ```rust
//! # use pdl_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder("pdl-server")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";
const QUIET_DEPENDENCIES: [&str; 5] =
    ["hyper=warn", "hyper_util=warn", "reqwest=warn", "rustls=warn", "h2=warn"];

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Rolling file output settings.
#[derive(Debug, Clone)]
pub struct FileOutput {
    pub directory: PathBuf,
    pub rotation: Rotation,
    pub max_files: usize,
    /// JSON lines instead of the plain format.
    pub json: bool,
}

impl FileOutput {
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        }
    }
}

/// Builder for the global tracing subscriber. The name doubles as the log file prefix.
#[derive(Debug)]
#[must_use = "call .init() to install the subscriber"]
pub struct LoggerBuilder {
    name: String,
    level: LevelFilter,
    console: bool,
    file: Option<FileOutput>,
    env_filter: Option<String>,
}

impl LoggerBuilder {
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    pub fn file(mut self, output: FileOutput) -> Self {
        self.file = Some(output);
        self
    }

    /// Explicit filter such as `pdl_resources=debug,pdl_sparql=trace`.
    /// It replaces both `RUST_LOG` and the dependency caps.
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Installs the global subscriber.
    ///
    /// The returned [`Logger`] owns the file writer's [`WorkerGuard`]; keep it alive for
    /// the lifetime of the process so buffered lines are flushed.
    ///
    /// # Errors
    /// [`LoggerError::Subscriber`] when a subscriber is already installed,
    /// [`LoggerError::InvalidConfiguration`] for rejected settings and
    /// [`LoggerError::Appender`] when the log directory cannot be used.
    pub fn init(self) -> Result<Logger, LoggerError> {
        self.validate()?;
        let filter = self.build_env_filter()?;

        let mut layers: Vec<BoxedLayer> = Vec::new();
        if self.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = match &self.file {
            Some(output) => {
                let (file_layer, guard) = file_layer(&self.name, output)?;
                layers.push(file_layer);
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(invalid("No logging layers enabled. Enable console or file output."));
        }

        tracing_subscriber::registry().with(layers).with(filter).try_init()?;
        Ok(Logger { guard })
    }

    fn validate(&self) -> Result<(), LoggerError> {
        if self.name.trim().is_empty() {
            return Err(invalid("Logger name cannot be empty"));
        }
        if self.file.as_ref().is_some_and(|output| output.max_files == 0) {
            return Err(invalid("max_files must be greater than zero"));
        }
        Ok(())
    }

    fn build_env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());

        if let Some(filter) = &self.env_filter {
            return builder
                .parse(filter)
                .map_err(|e| invalid(format!("Invalid env filter '{filter}': {e}")));
        }
        if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
            return Ok(builder.from_env_lossy());
        }

        let mut filter = builder.parse_lossy("");
        for directive in QUIET_DEPENDENCIES {
            let directive =
                directive.parse().map_err(|e| invalid(format!("Invalid directive '{directive}': {e}")))?;
            filter = filter.add_directive(directive);
        }
        Ok(filter)
    }
}

fn file_layer(name: &str, output: &FileOutput) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    fs::create_dir_all(&output.directory).map_err(|e| LoggerError::Internal {
        message: e.to_string().into(),
        context: Some(format!("Failed to create {}", output.directory.display()).into()),
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(output.rotation.clone())
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(output.max_files)
        .build(&output.directory)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let plain = layer().with_writer(writer).with_ansi(false);
    let boxed = if output.json { plain.json().boxed() } else { plain.boxed() };
    Ok((boxed, guard))
}

fn invalid(message: impl Into<std::borrow::Cow<'static, str>>) -> LoggerError {
    LoggerError::InvalidConfiguration { message: message.into(), context: None }
}

/// Handle to the installed logging system.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            name: name.into(),
            level: LevelFilter::INFO,
            console: true,
            file: None,
            env_filter: None,
        }
    }

    /// Installs a subscriber from plain settings, as read from a configuration file.
    ///
    /// `directory` switches on the rolling file layer; `json` only applies to it.
    ///
    /// # Errors
    /// Everything [`LoggerBuilder::init`] returns, plus
    /// [`LoggerError::InvalidConfiguration`] for an unknown level.
    pub fn from_settings(
        name: &str,
        level: &str,
        directory: Option<&Path>,
        json: bool,
    ) -> Result<Self, LoggerError> {
        let mut builder = Self::builder(name).level(parse_level(level)?);
        if let Some(directory) = directory {
            builder = builder.file(FileOutput { json, ..FileOutput::new(directory) });
        }
        builder.init()
    }

    /// The file writer guard, if file output is enabled.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Flushing log files");
        }
    }
}

/// Parses `trace`, `debug`, `info`, `warn`, `error` or `off`, case-insensitively.
///
/// # Errors
/// [`LoggerError::InvalidConfiguration`] for anything else.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    level.trim().parse::<LevelFilter>().map_err(|_| invalid(format!("Unknown log level '{level}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_console_at_info() {
        let builder = Logger::builder("pdl-test").env_filter("pdl_kernel=debug");
        assert!(builder.console);
        assert_eq!(builder.level, LevelFilter::INFO);
        assert_eq!(builder.env_filter.as_deref(), Some("pdl_kernel=debug"));
        assert!(builder.file.is_none());
    }

    #[test]
    fn file_output_defaults() {
        let output = FileOutput::new("logs");
        assert_eq!(output.max_files, DEFAULT_MAX_FILES);
        assert!(!output.json);
        assert_eq!(output.directory, PathBuf::from("logs"));
    }

    #[test]
    fn parse_level_accepts_known_levels() {
        assert_eq!(parse_level("debug").ok(), Some(LevelFilter::DEBUG));
        assert_eq!(parse_level(" WARN ").ok(), Some(LevelFilter::WARN));
        assert_eq!(parse_level("off").ok(), Some(LevelFilter::OFF));
        assert!(matches!(parse_level("chatty"), Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn validate_rejects_blank_name_and_zero_retention() {
        assert!(Logger::builder("  ").validate().is_err());
        let builder =
            Logger::builder("pdl").file(FileOutput { max_files: 0, ..FileOutput::new("logs") });
        assert!(builder.validate().is_err());
        assert!(Logger::builder("pdl").validate().is_ok());
    }

    #[test]
    fn invalid_explicit_filter_is_rejected() {
        let builder = Logger::builder("pdl").env_filter("pdl=[");
        assert!(matches!(builder.build_env_filter(), Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn init_needs_at_least_one_output() {
        let err = Logger::builder("pdl-none").console(false).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }
}
