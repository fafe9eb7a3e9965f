use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};

use crate::error::StageError;
use crate::prelude::*;

/// Which profiling flow a result file belongs to.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFlow {
    Cpu,
    Mem,
}

impl ProfileFlow {
    /// Suffix appended to a trace file name to form its per-trace result
    /// name.
    pub fn result_suffix(self) -> &'static str {
        match self {
            ProfileFlow::Cpu => "_cpu.json",
            ProfileFlow::Mem => "_mem.json",
        }
    }

    /// Name of the aggregate report inside the output folder.
    pub fn aggregate_file_name(self) -> &'static str {
        match self {
            ProfileFlow::Cpu => "all_results_cpu.json",
            ProfileFlow::Mem => "all_results_mem.json",
        }
    }
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Folder holding the per-trace result files
    #[arg(short, long, default_value = "results")]
    pub outfolder: PathBuf,

    /// Which flow's results to merge
    #[arg(short = 'F', long, value_enum)]
    pub flow: ProfileFlow,
}

pub fn run(args: MergeArgs) -> Result<()> {
    merge_results(&args.outfolder, args.flow)
}

/// Rebuilds the aggregate report from every per-trace result in `outfolder`.
/// Previous aggregates are excluded from the scan by name, so re-merging
/// never folds an aggregate into the next one.
pub fn merge_results(outfolder: &Path, flow: ProfileFlow) -> Result<()> {
    let mut all_results = Vec::new();
    for path in list_result_files(outfolder, flow)? {
        let contents = fs::read_to_string(&path).map_err(|source| StageError::Io {
            op: "read result file",
            path: path.clone(),
            source,
        })?;
        let document: serde_json::Value = serde_json::from_str(&contents)
            .with_context(|| format!("invalid JSON in result file {}", path.display()))?;
        all_results.push(document);
    }

    let aggregate_path = outfolder.join(flow.aggregate_file_name());
    let serialized =
        serde_json::to_string(&all_results).context("cannot serialize the aggregate report")?;
    write_result_file(&aggregate_path, &serialized)?;
    info!(
        "Merged {} result file(s) into {}",
        all_results.len(),
        aggregate_path.display()
    );
    Ok(())
}

pub fn write_result_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| StageError::Io {
        op: "write result file",
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Wrote {}", path.display());
    Ok(())
}

fn list_result_files(outfolder: &Path, flow: ProfileFlow) -> Result<Vec<PathBuf>> {
    let suffix = flow.result_suffix();
    Ok(crate::helpers::list_dir_sorted(outfolder)?
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(suffix) && !name.contains("all_results"))
        })
        .collect())
}
