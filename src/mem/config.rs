use std::path::PathBuf;

use itertools::Itertools;

use crate::helpers::OverwritePolicy;
use crate::prelude::*;

use super::{MemArgs, ProfileConfig};

#[derive(Debug)]
pub struct Config {
    pub folder: PathBuf,
    pub outfolder: PathBuf,
    pub bin_path: String,
    pub configs: Vec<ProfileConfig>,
    pub policy: OverwritePolicy,
    pub keep_going: bool,
}

impl TryFrom<MemArgs> for Config {
    type Error = Error;

    fn try_from(args: MemArgs) -> Result<Self> {
        if args.bin_path.trim().is_empty() {
            bail!("The profiler path is empty");
        }
        if args.configs.is_empty() {
            bail!("At least one profile configuration is required");
        }
        // A duplicate key would silently overwrite the earlier variant's
        // measurements in the report.
        if let Some(key) = args.configs.iter().map(|c| &c.key).duplicates().next() {
            bail!("duplicate profile configuration key `{key}`");
        }

        Ok(Self {
            folder: args.folder,
            outfolder: args.outfolder,
            bin_path: args.bin_path,
            configs: args.configs,
            policy: args.policy,
            keep_going: args.keep_going,
        })
    }
}
