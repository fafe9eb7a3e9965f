use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::error::StageError;
use crate::helpers::{OverwritePolicy, for_each_trace};
use crate::local_logger::Logger;
use crate::prelude::*;
use crate::profiler;
use crate::results::{self, ProfileFlow};

mod config;

use config::Config;

#[derive(Args, Debug)]
pub struct CpuArgs {
    /// Folder where the pcap traces are stored
    #[arg(short, long, default_value = "data")]
    pub folder: PathBuf,

    /// Folder where the per-trace results are written
    #[arg(short, long, default_value = "results")]
    pub outfolder: PathBuf,

    /// External profiler run once per trace (a .go source is run through
    /// `go run`)
    #[arg(short, long, default_value = "cpu_profile.go")]
    pub bin_path: String,

    /// Traffic configuration handed to the profiler
    #[arg(short, long, default_value = "trconfig.json")]
    pub config: PathBuf,

    /// Whether traces with an existing result file are profiled again
    #[arg(long, value_enum, default_value = "skip-existing")]
    pub policy: OverwritePolicy,

    /// Log per-trace failures and continue with the next trace instead of
    /// aborting the batch
    #[arg(long, default_value = "false")]
    pub keep_going: bool,
}

#[cfg(test)]
impl CpuArgs {
    /// Constructs a new `CpuArgs` with default values for testing purposes
    pub fn test() -> Self {
        Self {
            folder: "data".into(),
            outfolder: "results".into(),
            bin_path: "cpu_profile.go".into(),
            config: "trconfig.json".into(),
            policy: OverwritePolicy::SkipExisting,
            keep_going: false,
        }
    }
}

pub fn run(args: CpuArgs) -> Result<()> {
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
        ProfileFlow::Cpu.result_suffix(),
        config.policy,
        config.keep_going,
        |trace, outfile| profile_trace(&config, trace, outfile),
    )?;

    results::merge_results(&config.outfolder, ProfileFlow::Cpu)?;
    logger.persist_to(&config.outfolder)?;
    Ok(())
}

/// Profiles one trace and writes the profiler's JSON report verbatim.
fn profile_trace(config: &Config, trace: &Path, outfile: &Path) -> Result<()> {
    let report = profiler::run_cpu_profile(&config.bin_path, trace, &config.config)?;
    results::write_result_file(outfile, &report)
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use tempfile::TempDir;

    use super::*;

    /// An existing result must short-circuit the whole invocation: the
    /// profiler here does not exist, so reaching it would fail the batch.
    #[test]
    fn test_existing_result_skips_the_profiler() -> Result<()> {
        let data = TempDir::new()?;
        File::create(data.path().join("a.pcap"))?;
        let results_dir = TempDir::new()?;
        File::create(results_dir.path().join("a.pcap_cpu.json"))?;

        let config = Config::try_from(CpuArgs {
            folder: data.path().to_path_buf(),
            outfolder: results_dir.path().to_path_buf(),
            bin_path: "/nonexistent/profiler".into(),
            ..CpuArgs::test()
        })?;

        for_each_trace(
            &config.folder,
            &config.outfolder,
            ProfileFlow::Cpu.result_suffix(),
            config.policy,
            config.keep_going,
            |trace, outfile| profile_trace(&config, trace, outfile),
        )?;
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_batch_and_merge_with_stub_profiler() -> Result<()> {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let data = TempDir::new()?;
        File::create(data.path().join("x.pcap"))?;
        let results_dir = TempDir::new()?;

        let stub = data.path().join("profiler.sh");
        let mut script = File::create(&stub)?;
        writeln!(script, "#!/bin/sh")?;
        writeln!(script, "echo '{{\"Total_Time\": 1.5, \"Total_Packets\": 10}}'")?;
        drop(script);
        fs::set_permissions(&stub, fs::Permissions::from_mode(0o755))?;

        let config = Config::try_from(CpuArgs {
            folder: data.path().to_path_buf(),
            outfolder: results_dir.path().to_path_buf(),
            bin_path: stub.to_string_lossy().into_owned(),
            ..CpuArgs::test()
        })?;

        for_each_trace(
            &config.folder,
            &config.outfolder,
            ProfileFlow::Cpu.result_suffix(),
            config.policy,
            config.keep_going,
            |trace, outfile| profile_trace(&config, trace, outfile),
        )?;
        results::merge_results(&config.outfolder, ProfileFlow::Cpu)?;

        let report = fs::read_to_string(results_dir.path().join("x.pcap_cpu.json"))?;
        let document: serde_json::Value = serde_json::from_str(&report)?;
        assert_eq!(document["Total_Packets"], 10);

        let aggregate = fs::read_to_string(results_dir.path().join("all_results_cpu.json"))?;
        let documents: serde_json::Value = serde_json::from_str(&aggregate)?;
        assert_eq!(documents.as_array().unwrap().len(), 1);
        assert_eq!(documents[0], document);
        Ok(())
    }

    #[test]
    fn test_missing_profiler_aborts_new_traces() -> Result<()> {
        let data = TempDir::new()?;
        File::create(data.path().join("a.pcap"))?;
        let results_dir = TempDir::new()?;

        let config = Config::try_from(CpuArgs {
            folder: data.path().to_path_buf(),
            outfolder: results_dir.path().to_path_buf(),
            bin_path: "/nonexistent/profiler".into(),
            ..CpuArgs::test()
        })?;

        let res = for_each_trace(
            &config.folder,
            &config.outfolder,
            ProfileFlow::Cpu.result_suffix(),
            config.policy,
            config.keep_going,
            |trace, outfile| profile_trace(&config, trace, outfile),
        );
        assert!(res.is_err());
        Ok(())
    }
}
