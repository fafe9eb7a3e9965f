use std::path::PathBuf;

use crate::helpers::OverwritePolicy;
use crate::prelude::*;

use super::CpuArgs;

#[derive(Debug)]
pub struct Config {
    pub folder: PathBuf,
    pub outfolder: PathBuf,
    pub bin_path: String,
    pub config: PathBuf,
    pub policy: OverwritePolicy,
    pub keep_going: bool,
}

impl TryFrom<CpuArgs> for Config {
    type Error = Error;

    fn try_from(args: CpuArgs) -> Result<Self> {
        if args.bin_path.trim().is_empty() {
            bail!("The profiler path is empty");
        }

        Ok(Self {
            folder: args.folder,
            outfolder: args.outfolder,
            bin_path: args.bin_path,
            config: args.config,
            policy: args.policy,
            keep_going: args.keep_going,
        })
    }
}
