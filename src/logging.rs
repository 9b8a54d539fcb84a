//! Logging init: a daily file under the log dir mirrored to stderr, or
//! stderr alone when the directory cannot be used.

use anyhow::Result;
use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,campaign_uploader=debug";

/// Per-event handle on the day's log file. Falls back to stderr when the
/// handle cannot be duplicated; the tee adds the stderr copy separately.
enum DailyLogWriter {
    File(fs::File),
    Stderr,
}

impl io::Write for DailyLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            DailyLogWriter::File(f) => f.write(buf),
            DailyLogWriter::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            DailyLogWriter::File(f) => f.flush(),
            DailyLogWriter::Stderr => io::stderr().lock().flush(),
        }
    }
}

/// Owns the opened `app_YYYY_MM_DD.log` and hands out writers on it.
struct DailyLogFile(fs::File);

impl<'a> MakeWriter<'a> for DailyLogFile {
    type Writer = DailyLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(DailyLogWriter::File)
            .unwrap_or(DailyLogWriter::Stderr)
    }
}

pub fn log_file_name(date: NaiveDate) -> String {
    format!("app_{}.log", date.format("%Y_%m_%d"))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Tees every event into today's log file under `log_dir` and onto stderr.
/// Returns the log file path; errors leave the choice of fallback to the caller.
pub fn init_logging(log_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let log_file_path = log_dir.join(log_file_name(chrono::Local::now().date_naive()));

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    let writer = BoxMakeWriter::new(DailyLogFile(file).and(io::stderr));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!("logging initialized at {}", log_file_path.display());

    Ok(log_file_path)
}

/// Stderr-only subscriber for when the log directory cannot be used.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}
