use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::{Deserialize, Serialize};

use crate::error::StageError;
use crate::helpers::{OverwritePolicy, create_scratch_dir, for_each_trace, list_dir_sorted};
use crate::local_logger::Logger;
use crate::pprof;
use crate::prelude::*;
use crate::profiler;
use crate::results::{self, ProfileFlow};

mod config;
mod profile_set;

use config::Config;
pub use profile_set::ProfileConfig;

#[derive(Args, Debug)]
pub struct MemArgs {
    /// Folder where the pcap traces are stored
    #[arg(short, long, default_value = "data")]
    pub folder: PathBuf,

    /// Folder where the per-trace results are written
    #[arg(short, long, default_value = "results")]
    pub outfolder: PathBuf,

    /// External profiler run once per trace and configuration (a .go source
    /// is run through `go run`)
    #[arg(short, long, default_value = "mem_profile.go")]
    pub bin_path: String,

    /// Profiling variants to run for each trace, as key=path pairs (a bare
    /// path works when it contains exactly one recognized tag)
    #[arg(
        short,
        long = "config",
        value_name = "KEY=PATH",
        default_values_t = ProfileConfig::default_set()
    )]
    pub configs: Vec<ProfileConfig>,

    /// Whether traces with an existing result file are profiled again
    #[arg(long, value_enum, default_value = "always")]
    pub policy: OverwritePolicy,

    /// Log per-trace failures and continue with the next trace instead of
    /// aborting the batch
    #[arg(long, default_value = "false")]
    pub keep_going: bool,
}

#[cfg(test)]
impl MemArgs {
    /// Constructs a new `MemArgs` with default values for testing purposes
    pub fn test() -> Self {
        Self {
            folder: "data".into(),
            outfolder: "results".into(),
            bin_path: "mem_profile.go".into(),
            configs: ProfileConfig::default_set(),
            policy: OverwritePolicy::Always,
            keep_going: false,
        }
    }
}

/// Per-trace memory report: configuration key to the ordered byte
/// measurements of its heap snapshots.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryProfile(pub BTreeMap<String, Vec<f64>>);

pub fn run(args: MemArgs) -> Result<()> {
    let config = Config::try_from(args)?;
    let logger = Logger::init()?;
    debug!("config: {:#?}", config);

    fs::create_dir_all(&config.outfolder).map_err(|source| StageError::Io {
        op: "create results folder",
        path: config.outfolder.clone(),
        source,
    })?;

    for_each_trace(
        &config.folder,
        &config.outfolder,
        ProfileFlow::Mem.result_suffix(),
        config.policy,
        config.keep_going,
        |trace, outfile| profile_trace(&config, trace, outfile),
    )?;

    results::merge_results(&config.outfolder, ProfileFlow::Mem)?;
    logger.persist_to(&config.outfolder)?;
    Ok(())
}

/// Profiles one trace under every configured variant and writes the
/// resulting per-variant measurements as a single JSON object.
fn profile_trace(config: &Config, trace: &Path, outfile: &Path) -> Result<()> {
    let mut profile = MemoryProfile::default();
    for variant in &config.configs {
        let measurements = profile_variant(&config.bin_path, trace, variant)
            .with_context(|| format!("variant `{}` failed", variant.key))?;
        profile.0.insert(variant.key.clone(), measurements);
    }
    let document =
        serde_json::to_string(&profile).context("cannot serialize the memory profile")?;
    results::write_result_file(outfile, &document)
}

/// One variant's pass: run the profiler against a fresh scratch folder, then
/// render and scrape every heap profile it deposited there. Profiles are
/// visited in name order so measurement ordinals follow the profiler's
/// snapshot sequence. The scratch folder is removed when the pass ends,
/// successful or not.
fn profile_variant(bin_path: &str, trace: &Path, variant: &ProfileConfig) -> Result<Vec<f64>> {
    let scratch = create_scratch_dir(trace, &variant.key)?;
    profiler::run_mem_profile(bin_path, trace, scratch.path(), &variant.path)?;

    let mut measurements = Vec::new();
    for raw_profile in list_dir_sorted(scratch.path())? {
        let report = pprof::render_report(&raw_profile)?;
        measurements.push(pprof::scrape_inuse_bytes(&report)?);
    }
    Ok(measurements)
}
