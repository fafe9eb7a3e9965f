use std::path::PathBuf;
use std::process::ExitStatus;

/// Failure kinds of the three stages every profiling run goes through:
/// spawning external tools, scraping their reports, and touching the
/// filesystem. Carried inside the `anyhow` chain so callers can downcast to
/// tell them apart.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("`{command}` exited with {status}")]
    Process {
        command: String,
        status: ExitStatus,
    },

    #[error("malformed measurement token `{token}` in report line `{line}`")]
    Parse { token: String, line: String },

    #[error("cannot {op} {}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
