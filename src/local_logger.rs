use std::env;
use std::fs::copy;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{CombinedLogger, ConfigBuilder, SharedLogger, WriteLogger};
use tempfile::NamedTempFile;

use crate::prelude::*;

pub fn get_local_logger() -> Box<dyn SharedLogger> {
    let log_level = env::var("TRPROF_LOG")
        .ok()
        .and_then(|log_level| log_level.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Debug)
        .build();

    simplelog::TermLogger::new(
        log_level,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
}

pub fn init_local_logger() -> Result<()> {
    CombinedLogger::init(vec![get_local_logger()]).context("Failed to init logger")?;
    Ok(())
}

/// Terminal logger combined with a trace-level file logger. The log file is
/// written to a temporary location and copied into the output folder once a
/// batch finishes.
pub struct Logger {
    log_file_path: PathBuf,
}

impl Logger {
    pub fn init() -> Result<Self> {
        let log_file = NamedTempFile::new().context("Failed to create log file")?;
        let log_file_path = log_file.path().to_path_buf();
        let file_logger_config = ConfigBuilder::new().build();
        let file_logger = WriteLogger::new(LevelFilter::Trace, file_logger_config, log_file);
        CombinedLogger::init(vec![get_local_logger(), file_logger])
            .context("Failed to init logger")?;
        Ok(Self { log_file_path })
    }

    pub fn persist_to(&self, outfolder: &Path) -> Result<()> {
        let dest_log_file_path = outfolder.join("trprof.log");
        debug!("Persisting log file to {}", dest_log_file_path.display());
        log::logger().flush();
        copy(&self.log_file_path, dest_log_file_path).context("Failed to copy log file")?;
        Ok(())
    }
}
