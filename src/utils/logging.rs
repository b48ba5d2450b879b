/// Logger setup shared by the command-line tools

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use log::LevelFilter;

/// Set up logging to stderr, or to `log_file` when one is given
///
/// # Errors
///
/// Fails when the log file cannot be created.
pub fn setup_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::new();

    builder.filter_level(level);

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    // A logger may already be installed (e.g. when called twice in tests)
    let _ = builder.try_init();

    Ok(())
}
