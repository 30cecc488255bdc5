use std::path::Path;
use time::macros::format_description;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, time::LocalTime},
    prelude::*,
};

const LOG_FILE: &str = "mr.log";

/// Keep the returned guard alive until exit or buffered file lines are lost.
pub fn init_logger(level: Level, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ));

    let stderr = fmt::layer()
        .with_timer(timer.clone())
        .with_writer(std::io::stderr);

    let (file, guard) = match log_dir {
        Some(dir) => {
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, LOG_FILE));
            let layer = fmt::layer()
                .with_timer(timer)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(stderr)
        .with(file)
        .try_init();
    guard
}
