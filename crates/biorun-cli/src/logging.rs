use crate::error::{CliError, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    fmt::{self},
    prelude::*,
};

/// Log targets of the binary and its core library.
const OWN_TARGETS: [&str; 2] = ["biorun", "biorun_core"];

/// Verbosity at which third-party crates are no longer capped at WARN.
const DEPENDENCY_VERBOSITY: u8 = 4;

fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::OFF
    } else {
        match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

fn targets(verbosity: u8, quiet: bool) -> Targets {
    let level = level_filter(verbosity, quiet);
    let dependencies = if verbosity >= DEPENDENCY_VERBOSITY {
        level
    } else {
        level.min(LevelFilter::WARN)
    };
    OWN_TARGETS
        .iter()
        .fold(Targets::new(), |filter, target| filter.with_target(*target, level))
        .with_default(dependencies)
}

/// Opens the log file for appending so consecutive batch runs share one log.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(CliError::Io)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(CliError::Io)
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(targets(verbosity, quiet))
        .with(stderr_layer);

    if let Some(path) = log_file {
        let file = open_log_file(&path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_target(true);

        subscriber.with(file_layer).init();
    } else {
        subscriber.init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use std::sync::Once;
    use tracing::{Level, debug, error, info, trace, warn};

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("Failed to set up global logger for tests");
        });
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(7, false), LevelFilter::TRACE);
        assert_eq!(level_filter(3, true), LevelFilter::OFF);
    }

    #[test]
    fn dependencies_stay_at_warn_until_maximum_verbosity() {
        let filter = targets(2, false);
        assert!(filter.would_enable("biorun_core::workflows::search", &Level::DEBUG));
        assert!(!filter.would_enable("tokio::process", &Level::INFO));
        assert!(filter.would_enable("tokio::process", &Level::WARN));

        let filter = targets(DEPENDENCY_VERBOSITY, false);
        assert!(filter.would_enable("tokio::process", &Level::TRACE));

        let filter = targets(2, true);
        assert!(!filter.would_enable("biorun_core::engine::docker", &Level::ERROR));
    }

    #[test]
    #[serial]
    fn initialization_and_macros_work() {
        ensure_global_logger_is_set();

        error!("This is an error");
        warn!("This is a warning");
        info!("This is info");
        debug!("This is debug");
        trace!("This is trace");
    }

    #[test]
    fn log_file_is_appended_and_parents_are_created() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("logs/nested/biorun.log");

        writeln!(open_log_file(&log_path).unwrap(), "first run").unwrap();
        writeln!(open_log_file(&log_path).unwrap(), "second run").unwrap();

        let content = std::fs::read_to_string(log_path).unwrap();
        assert_eq!(content, "first run\nsecond run\n");
    }

    #[test]
    #[serial]
    fn file_layer_writes_thread_ids() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("biorun.log");

        let file_layer = fmt::layer()
            .with_writer(open_log_file(&log_path).unwrap())
            .with_ansi(false)
            .with_thread_ids(true);
        let subscriber = tracing_subscriber::registry().with(file_layer);

        tracing::subscriber::with_default(subscriber, || {
            debug!("Running: docker run --rm foldseek easy-search");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("docker run --rm foldseek easy-search"));
        assert!(content.contains("DEBUG"));
        assert!(content.contains("ThreadId"));
    }

    #[test]
    #[serial]
    fn invalid_log_file_path_propagates_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let result = setup_logging(0, false, Some(invalid_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
