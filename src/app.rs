use clap::{
    Parser, Subcommand,
    builder::{Styles, styling},
};

use crate::cpu::{self, CpuArgs};
use crate::local_logger::init_local_logger;
use crate::mem::{self, MemArgs};
use crate::prelude::*;
use crate::results::{self, MergeArgs};

fn create_styles() -> Styles {
    styling::Styles::styled()
        .header(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .literal(styling::AnsiColor::Cyan.on_default() | styling::Effects::BOLD)
        .placeholder(styling::AnsiColor::Cyan.on_default())
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Batch CPU and memory profiling of packet traces",
    styles = create_styles()
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Profile the packet-processing CPU cost of every trace in a folder
    Cpu(CpuArgs),
    /// Profile the flow-cache memory usage of every trace in a folder
    Mem(MemArgs),
    /// Rebuild the aggregate report from the per-trace results in a folder
    Merge(MergeArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // The batch drivers install their own file-backed logger
        Commands::Cpu(_) | Commands::Mem(_) => {}
        _ => init_local_logger()?,
    }

    match cli.command {
        Commands::Cpu(args) => cpu::run(args),
        Commands::Mem(args) => mem::run(args),
        Commands::Merge(args) => results::run(args),
    }
}
