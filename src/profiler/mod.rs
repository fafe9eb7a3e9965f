use std::path::Path;
use std::process::Output;

use crate::error::StageError;
use crate::prelude::*;

mod command;

pub use command::CommandBuilder;

pub const PROFILER_TARGET: &str = "profiler";

/// Builds the base invocation for the configured profiler. An identifier
/// ending in `.go` is run through `go run`; anything else is executed
/// directly, so a prebuilt profiler binary is a valid value too.
fn profiler_command(bin_path: &str) -> CommandBuilder {
    if bin_path.ends_with(".go") {
        let mut cmd = CommandBuilder::new("go");
        cmd.args(["run", bin_path]);
        cmd
    } else {
        CommandBuilder::new(bin_path)
    }
}

/// Runs one CPU profiling pass over `trace` and returns the profiler's JSON
/// report captured from stdout.
pub fn run_cpu_profile(bin_path: &str, trace: &Path, config: &Path) -> Result<String> {
    let mut cmd = profiler_command(bin_path);
    cmd.arg("-trace").arg(trace).arg("-conf").arg(config);
    info!("Running profile: {}", cmd.as_command_line());
    let output = run_captured(&cmd)?;
    String::from_utf8(output.stdout).context("profiler emitted non-UTF-8 output")
}

/// Runs one memory profiling pass over `trace`. The profiler deposits raw
/// heap profiles into `scratch` as a side effect; its stdout is discarded.
pub fn run_mem_profile(bin_path: &str, trace: &Path, scratch: &Path, config: &Path) -> Result<()> {
    let mut cmd = profiler_command(bin_path);
    cmd.arg("-trace").arg(trace);
    cmd.arg("-folder").arg(scratch);
    cmd.arg("-conf").arg(config);
    info!("Running profile: {}", cmd.as_command_line());
    run_captured(&cmd)?;
    Ok(())
}

/// Synchronously runs `cmd` with captured output, blocking until the child
/// exits. A non-zero exit status is a `StageError::Process` carrying the
/// rendered command line; the child's stderr is forwarded to the log either
/// way.
pub(crate) fn run_captured(cmd: &CommandBuilder) -> Result<Output> {
    let command_line = cmd.as_command_line();
    let output = cmd.build().output().map_err(|source| StageError::Io {
        op: "spawn",
        path: cmd.program().into(),
        source,
    })?;
    if !output.stderr.is_empty() {
        trace!(
            target: PROFILER_TARGET,
            "[stderr]{}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
    if !output.status.success() {
        error!("{}", String::from_utf8_lossy(&output.stderr));
        return Err(StageError::Process {
            command: command_line,
            status: output.status,
        }
        .into());
    }
    Ok(output)
}
