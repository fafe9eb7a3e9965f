use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::error::StageError;
use crate::prelude::*;

pub const TRACE_EXTENSION: &str = ".pcap";

/// Lists the entries of `folder`, sorted by name. Listing order of the
/// underlying filesystem is platform-dependent; sorting keeps run order and
/// report ordinals stable.
pub fn list_dir_sorted(folder: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(folder).map_err(|source| StageError::Io {
        op: "list folder",
        path: folder.to_path_buf(),
        source,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| StageError::Io {
            op: "list folder",
            path: folder.to_path_buf(),
            source,
        })?;
        paths.push(entry.path());
    }
    Ok(paths.into_iter().sorted().collect())
}

/// The packet traces in `folder`, recognized by extension.
pub fn list_trace_files(folder: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_dir_sorted(folder)?
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(TRACE_EXTENSION))
        })
        .collect())
}

/// Result path for one trace: the trace file name with the flow suffix
/// appended, inside `outfolder` (`x.pcap` becomes `x.pcap_cpu.json`).
pub fn result_path(outfolder: &Path, trace: &Path, suffix: &str) -> Result<PathBuf> {
    let name = trace
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("invalid trace file name: {}", trace.display()))?;
    Ok(outfolder.join(format!("{name}{suffix}")))
}
