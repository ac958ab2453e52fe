//! Process-wide log sink.
//!
//! Events are single `key=value` lines (`event=... module=... status=...`).
//! Student personal data (name, email, mobile) never appears in an event;
//! events carry document ids, counts and error kinds only.
//!
//! The sink is installed at most once per process. Repeating the call with
//! the same level and directory is accepted, any other configuration is
//! refused, and nothing here panics.

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, LogSpecBuilder, Logger,
    LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_BASENAME: &str = "regdesk";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED: usize = 5;
const PANIC_SUMMARY_CHARS: usize = 160;

static SINK: OnceCell<ActiveSink> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

pub type LoggingResult<T> = Result<T, LoggingError>;

/// Log sink setup failure.
#[derive(Debug)]
pub enum LoggingError {
    /// Not one of `trace|debug|info|warn|error`.
    InvalidLevel(String),
    /// Blank or relative log directory.
    InvalidDirectory(String),
    CreateDirectory {
        dir: PathBuf,
        source: std::io::Error,
    },
    Backend(FlexiLoggerError),
    /// A sink with another level or directory is already running.
    AlreadyActive {
        active: String,
        requested: String,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidDirectory(dir) => {
                write!(f, "log directory must be a non-empty absolute path, got `{dir}`")
            }
            Self::CreateDirectory { dir, source } => {
                write!(f, "cannot create log directory `{}`: {source}", dir.display())
            }
            Self::Backend(err) => write!(f, "logger backend failed to start: {err}"),
            Self::AlreadyActive { active, requested } => write!(
                f,
                "logging already active ({active}); refusing to switch to {requested}"
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDirectory { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            Self::InvalidLevel(_) | Self::InvalidDirectory(_) | Self::AlreadyActive { .. } => None,
        }
    }
}

impl From<FlexiLoggerError> for LoggingError {
    fn from(value: FlexiLoggerError) -> Self {
        Self::Backend(value)
    }
}

struct ActiveSink {
    level: LevelFilter,
    dir: PathBuf,
    _handle: LoggerHandle,
}

impl ActiveSink {
    fn start(level: LevelFilter, dir: PathBuf) -> LoggingResult<Self> {
        std::fs::create_dir_all(&dir).map_err(|source| LoggingError::CreateDirectory {
            dir: dir.clone(),
            source,
        })?;

        let spec = LogSpecBuilder::new().default(level).build();
        let handle = Logger::with(spec)
            .log_to_file(FileSpec::default().directory(&dir).basename(LOG_BASENAME))
            .rotate(
                Criterion::Size(ROTATE_AT_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(KEEP_ROTATED),
            )
            .duplicate_to_stderr(Duplicate::Error)
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()?;

        install_panic_hook();
        info!(
            "event=logging_start module=core status=ok level={} log_dir={} version={} platform={}",
            level,
            dir.display(),
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS
        );

        Ok(Self {
            level,
            dir,
            _handle: handle,
        })
    }

    fn accepts(&self, level: LevelFilter, dir: &Path) -> LoggingResult<()> {
        if self.level == level && self.dir == dir {
            return Ok(());
        }
        Err(LoggingError::AlreadyActive {
            active: describe(self.level, &self.dir),
            requested: describe(level, dir),
        })
    }
}

/// Starts the rolling file sink under `log_dir` (absolute).
///
/// Files are named `regdesk*.log`, rotate at 10 MiB and keep five
/// generations. Error events are also copied to stderr.
///
/// # Errors
/// Invalid level or directory, directory creation or backend failure, or a
/// sink already running with another configuration.
pub fn init_logging(level: &str, log_dir: &str) -> LoggingResult<()> {
    let level = parse_level(level)?;
    let dir = parse_log_dir(log_dir)?;
    // A racing caller may install first; its configuration is checked below.
    let sink = SINK.get_or_try_init(|| ActiveSink::start(level, dir.clone()))?;
    sink.accepts(level, &dir)
}

/// Level and directory of the running sink.
pub fn logging_status() -> Option<(LevelFilter, PathBuf)> {
    SINK.get().map(|sink| (sink.level, sink.dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn parse_level(raw: &str) -> LoggingResult<LevelFilter> {
    let trimmed = raw.trim();
    let name = if trimmed.eq_ignore_ascii_case("warning") {
        "warn"
    } else {
        trimmed
    };
    match name.parse::<LevelFilter>() {
        Ok(LevelFilter::Off) | Err(_) => Err(LoggingError::InvalidLevel(trimmed.to_string())),
        Ok(level) => Ok(level),
    }
}

fn parse_log_dir(raw: &str) -> LoggingResult<PathBuf> {
    let path = Path::new(raw.trim());
    if raw.trim().is_empty() || !path.is_absolute() {
        return Err(LoggingError::InvalidDirectory(raw.to_string()));
    }
    Ok(path.to_path_buf())
}

fn describe(level: LevelFilter, dir: &Path) -> String {
    format!("level={level} dir={}", dir.display())
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let location = panic.location().map_or_else(
            || "unknown".to_string(),
            |loc| format!("{}:{}", loc.file(), loc.line()),
        );
        // Payloads may echo form input.
        error!(
            "event=panic module=core status=error location={location} summary={}",
            panic_summary(panic)
        );
        previous(panic);
    }));
}

fn panic_summary(panic: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = panic.payload();
    let text = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload");
    one_line(text, PANIC_SUMMARY_CHARS)
}

fn one_line(text: &str, max_chars: usize) -> String {
    let mut line = text
        .chars()
        .take(max_chars)
        .map(|c| if matches!(c, '\n' | '\r') { ' ' } else { c })
        .collect::<String>();
    if text.chars().nth(max_chars).is_some() {
        line.push_str("...");
    }
    line
}
