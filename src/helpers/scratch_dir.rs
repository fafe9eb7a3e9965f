use std::env;
use std::path::Path;

use tempfile::TempDir;

use crate::error::StageError;
use crate::prelude::*;

/// Creates a uniquely named scratch folder for one (trace, configuration)
/// profiling run. The folder lives under the system temp dir and is removed
/// when the returned handle drops, including when the run fails midway.
pub fn create_scratch_dir(trace: &Path, key: &str) -> Result<TempDir> {
    let stem = trace
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("trace");
    let scratch = tempfile::Builder::new()
        .prefix(&format!("trprof.{stem}.{key}."))
        .tempdir()
        .map_err(|source| StageError::Io {
            op: "create scratch folder in",
            path: env::temp_dir(),
            source,
        })?;
    debug!("Created scratch folder: {}", scratch.path().display());
    Ok(scratch)
}
