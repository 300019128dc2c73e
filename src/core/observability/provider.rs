use crate::app::config::{FileRotation, LogType, LoggingConfig};
use anyhow::{Context, Result, anyhow};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

type DynLayer = Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync + 'static>;

/// Keeps the non blocking writers flushing. Drop it only on exit
pub struct LogGuards(#[allow(dead_code)] Vec<WorkerGuard>);

/// Installs the global tracing subscriber described by the config.
/// Stdout stays free for the harness output, so console logs go
/// to stderr
pub fn init(config: &LoggingConfig) -> Result<LogGuards> {
    config.validate()?;

    let crate_name = env!("CARGO_PKG_NAME").replace('-', "_");
    let filter = EnvFilter::from_default_env()
        .add_directive("error".parse()?)
        .add_directive(format!("{}={}", crate_name, config.level).parse()?);

    let mut layers: Vec<DynLayer> = Vec::new();
    let mut guards = Vec::new();

    for sink in &config.sinks {
        match &sink.dest {
            LogType::Stderr { color, json } => {
                let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
                guards.push(guard);

                if *json {
                    layers.push(fmt::layer().json().with_writer(writer).boxed());
                } else {
                    layers.push(
                        fmt::layer()
                            .compact()
                            .with_ansi(*color)
                            .with_span_events(FmtSpan::CLOSE)
                            .with_writer(writer)
                            .boxed(),
                    );
                }
            }
            LogType::File {
                path,
                json,
                rotation,
                max_files,
            } => {
                let (writer, guard) = create_file_writer(path, rotation, *max_files)?;
                guards.push(guard);

                if *json {
                    layers.push(fmt::layer().json().with_writer(writer).boxed());
                } else {
                    layers.push(
                        fmt::layer()
                            .compact()
                            .with_ansi(false)
                            .with_writer(writer)
                            .boxed(),
                    );
                }
            }
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    Ok(LogGuards(guards))
}

fn create_file_writer(
    path: &Path,
    rotation: &FileRotation,
    max_files: usize,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Invalid file name in path: {}", path.display()))?;

    let directory = path
        .parent()
        .ok_or_else(|| anyhow!("Invalid directory in path: {}", path.display()))?;

    let directory = if directory.as_os_str().is_empty() {
        Path::new(".")
    } else {
        directory
    };

    std::fs::create_dir_all(directory)
        .with_context(|| format!("failed to create log directory {}", directory.display()))?;

    let file_appender = match rotation {
        FileRotation::Daily => tracing_appender::rolling::daily(directory, file_name),
        FileRotation::Hourly => tracing_appender::rolling::hourly(directory, file_name),
        FileRotation::Never => tracing_appender::rolling::never(directory, file_name),
    };

    cleanup_old_files(directory, file_name, max_files)?;

    Ok(tracing_appender::non_blocking(file_appender))
}

fn cleanup_old_files(directory: &Path, prefix: &str, max_files: usize) -> Result<()> {
    if max_files == 0 {
        return Ok(());
    }

    let mut files: Vec<_> = std::fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .map(|name| name.starts_with(prefix))
                .unwrap_or(false)
        })
        .filter_map(|entry| {
            entry
                .metadata()
                .ok()
                .and_then(|meta| meta.modified().ok().map(|time| (entry.path(), time)))
        })
        .collect();

    if files.len() <= max_files {
        return Ok(());
    }

    files.sort_by(|a, b| b.1.cmp(&a.1));

    for (path, _) in files.iter().skip(max_files) {
        let _ = std::fs::remove_file(path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_keeps_newest() {
        let dir = std::env::temp_dir().join(format!("flux-logs-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        for i in 0..4 {
            std::fs::write(dir.join(format!("flux.log.{}", i)), "x").unwrap();
            std::thread::sleep(std::time::Duration::from_millis(50));
        }
        std::fs::write(dir.join("other.txt"), "x").unwrap();

        cleanup_old_files(&dir, "flux.log", 2).unwrap();

        let mut left: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        left.sort();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(left, vec!["flux.log.2", "flux.log.3", "other.txt"]);
    }

    #[test]
    fn test_init_rejects_invalid_config() {
        let cfg = LoggingConfig {
            level: "info".into(),
            sinks: vec![],
        };
        assert!(init(&cfg).is_err());
    }
}
