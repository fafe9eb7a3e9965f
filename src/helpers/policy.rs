use std::path::Path;

use clap::ValueEnum;

/// Whether a batch run recomputes results that already exist on disk.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Leave existing result files untouched and only profile new traces
    SkipExisting,
    /// Profile every trace and overwrite its result file
    Always,
}

impl OverwritePolicy {
    /// Returns whether the trace owning `result_path` should be profiled.
    pub fn should_process(self, result_path: &Path) -> bool {
        match self {
            OverwritePolicy::Always => true,
            OverwritePolicy::SkipExisting => !result_path.exists(),
        }
    }
}
