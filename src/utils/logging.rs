use std::{path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

pub const CLI_PREFIX: &str = "cli";

const LOG_FILES_KEPT: usize = 5;
const DEFAULT_LEVEL: &str = "info";

/// Every run appends to a daily rotated file under `<application_data_path>/logs`. With `console`
/// the same events go to stderr as well, so they never interleave with tables printed on stdout.
pub fn enable_logging(
    prefix: &str,
    application_data_path: &Path,
    log_level: Option<LevelFilter>,
    console: bool,
) -> Result<()> {
    let file = Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(LOG_FILES_KEPT)
        .filename_prefix(prefix)
        .build(application_data_path.join("logs"))?;
    let stderr = std::io::stderr.with_filter(move |_| console);

    let level = log_level
        .map(|v| v.to_string())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LEVEL.into());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(crate_directive(&level)))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(stderr.and(file))
        .with_ansi(false)
        .pretty()
        .init();
    Ok(())
}

/// Only events of this crate are logged, dependencies stay quiet.
fn crate_directive(level: &str) -> String {
    format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_"))
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::EnvFilter;

    use super::crate_directive;

    #[test]
    fn directive_targets_this_crate() {
        assert_eq!(crate_directive("debug"), "metodo=debug");
        assert_eq!(
            crate_directive(&LevelFilter::TRACE.to_string()),
            "metodo=trace"
        );
        assert!(EnvFilter::try_new(crate_directive("info")).is_ok());
    }
}
