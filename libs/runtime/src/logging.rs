//! Logging bootstrap.
//!
//! Console output is human-readable; file output is JSON, one rotating file per
//! configured section. Sections other than `default` are keyed by target
//! prefix (`profiles`, `case_monitor`, `tower_http`, ...) and claim every event
//! whose target starts with that prefix. The `default` section gets the rest.

use crate::config::{LoggingConfig, Section};
use std::{
    collections::HashMap,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::filter::{FilterFn, Targets};
use tracing_subscriber::fmt;

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 5;

fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        // Unknown or empty values fall back to INFO
        _ => Some(Level::INFO),
    }
}

/// `target == prefix` or `target` starts with `prefix::`.
fn target_matches(target: &str, prefix: &str) -> bool {
    target == prefix
        || (target.starts_with(prefix) && target[prefix.len()..].starts_with("::"))
}

type RestFilter = FilterFn<Box<dyn Fn(&tracing::Metadata<'_>) -> bool + Send + Sync + 'static>>;

/// Filter for the `default` section: everything not claimed by a named section.
fn unclaimed_targets(claimed: &[String], max_level: Level) -> RestFilter {
    let claimed = claimed.to_vec();
    FilterFn::new(Box::new(move |meta: &tracing::Metadata<'_>| {
        !claimed.iter().any(|p| target_matches(meta.target(), p)) && meta.level() <= &max_level
    }))
}

// -------- rotating file writers --------

#[derive(Clone)]
struct SharedFile(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for SharedFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log file lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log file lock poisoned"))?
            .flush()
    }
}

/// Writer that may be detached; detached writes are dropped.
struct MaybeFile(Option<SharedFile>);

impl Write for MaybeFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(f) => f.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

/// Picks the file for an event by its target prefix, else the default file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<SharedFile>,
    by_prefix: HashMap<String, SharedFile>,
}

impl FileRouter {
    fn pick(&self, target: &str) -> Option<SharedFile> {
        self.by_prefix
            .iter()
            .find(|(prefix, _)| target_matches(target, prefix))
            .map(|(_, f)| f.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = MaybeFile;

    fn make_writer(&'a self) -> Self::Writer {
        MaybeFile(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        MaybeFile(self.pick(meta.target()))
    }
}

/// Relative log paths live under the server home dir.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating(
    path: &Path,
    section: &Section,
) -> Result<SharedFile, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let max_files = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);

    let rot = FileRotate::new(
        path,
        AppendTimestamp::default(FileLimit::MaxFiles(max_files)),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(SharedFile(Arc::new(Mutex::new(rot))))
}

fn open_section_file(name: &str, section: &Section, base_dir: &Path) -> Option<SharedFile> {
    if section.file.trim().is_empty() {
        return None;
    }
    let path = resolve_log_path(&section.file, base_dir);
    match open_rotating(&path, section) {
        Ok(f) => Some(f),
        Err(e) => {
            // The subscriber is not installed yet, so stderr is the only channel.
            eprintln!(
                "failed to open log file for '{}': {} ({})",
                name,
                path.display(),
                e
            );
            None
        }
    }
}

// -------- plan --------

/// Everything derived from the config before any subscriber is installed.
struct LoggingPlan {
    default_section: Option<Section>,
    claimed: Vec<String>,
    console_targets: Targets,
    file_targets: Targets,
    files: FileRouter,
}

fn plan(cfg: &LoggingConfig, base_dir: &Path) -> LoggingPlan {
    let mut named: Vec<(&String, &Section)> =
        cfg.iter().filter(|(k, _)| k.as_str() != "default").collect();
    // Longest prefix first so "profiles::api" wins over "profiles".
    named.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));

    let mut console_targets = Targets::new().with_default(LevelFilter::OFF);
    let mut file_targets = Targets::new().with_default(LevelFilter::OFF);
    let mut files = FileRouter::default();

    for (name, section) in &named {
        if let Some(level) = parse_level(&section.console_level) {
            console_targets = console_targets.with_target(name.as_str(), level);
        }
        if let Some(file) = open_section_file(name, section, base_dir) {
            files.by_prefix.insert((*name).clone(), file);
            if let Some(level) = parse_level(&section.file_level) {
                file_targets = file_targets.with_target(name.as_str(), level);
            }
        }
    }

    let default_section = cfg.get("default").cloned();
    if let Some(section) = &default_section {
        files.default = open_section_file("default", section, base_dir);
    }

    LoggingPlan {
        default_section,
        claimed: named.iter().map(|(n, _)| (*n).clone()).collect(),
        console_targets,
        file_targets,
        files,
    }
}

// -------- public init --------

/// Initialize the global subscriber from config.
///
/// `base_dir` resolves relative log file paths (normally `server.home_dir`).
/// Calling it twice is harmless: the second install is ignored.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` records (sqlx, hyper) into tracing before installing the subscriber
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    install(plan(cfg, base_dir));
}

fn init_default_logging() {
    let _ = fmt()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}

fn install(plan: LoggingPlan) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

    let ansi = atty::is(atty::Stream::Stdout);
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    layers.push(
        fmt::layer()
            .with_ansi(ansi)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(plan.console_targets)
            .boxed(),
    );

    if !plan.files.is_empty() {
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(plan.files.clone())
                .with_filter(plan.file_targets)
                .boxed(),
        );
    }

    if let Some(section) = &plan.default_section {
        if let Some(level) = parse_level(&section.console_level) {
            layers.push(
                fmt::layer()
                    .with_ansi(ansi)
                    .with_target(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_filter(unclaimed_targets(&plan.claimed, level))
                    .boxed(),
            );
        }
        if plan.files.default.is_some() {
            if let Some(level) = parse_level(&section.file_level) {
                layers.push(
                    fmt::layer()
                        .json()
                        .with_ansi(false)
                        .with_target(true)
                        .with_timer(fmt::time::UtcTime::rfc_3339())
                        .with_writer(plan.files.clone())
                        .with_filter(unclaimed_targets(&plan.claimed, level))
                        .boxed(),
                );
            }
        }
    }

    let _ = Registry::default().with(layers).try_init();
}
