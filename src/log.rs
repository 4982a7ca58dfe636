use std::path::PathBuf;

use chrono::Utc;
use directories::BaseDirs;
use tracing_appender;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, Registry};

pub fn init_logging(debug: bool) -> tracing_appender::non_blocking::WorkerGuard {
    let log_file = get_log_location();
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .unwrap();

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let default_level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();
    // The subscriber should be an append-only file

    let formatter = BunyanFormattingLayer::new("treeos".into(), non_blocking);

    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatter);
    tracing_log::LogTracer::init().ok();
    tracing::subscriber::set_global_default(subscriber).unwrap();

    guard
}

fn get_log_location() -> PathBuf {
    let base_dirs = BaseDirs::new().unwrap();
    let log_dir = base_dirs.data_dir().join("treeos").join("logs");
    std::fs::create_dir_all(&log_dir).unwrap();
    let timestamp = Utc::now().format("%Y-%m-%d-%H-%M-%S");
    let log_file = log_dir.join(format!("treeos-{}.log", timestamp));
    clean_logfiles(&log_dir);
    log_file
}

fn clean_logfiles(log_dir: &PathBuf) {
    // Logfiles from more than 30 days ago are deleted
    let files = std::fs::read_dir(log_dir).unwrap();
    for file in files.flatten() {
        let modified = file.metadata().and_then(|metadata| metadata.modified());
        let modified = match modified {
            Ok(modified) => modified,
            Err(_) => continue,
        };
        let modified: chrono::DateTime<Utc> = chrono::DateTime::from(modified);
        let duration = Utc::now().signed_duration_since(modified);
        if duration.num_days() > 30 {
            let _ = std::fs::remove_file(file.path());
        }
    }
}
