use std::path::Path;

use crate::prelude::*;

use super::{OverwritePolicy, list_trace_files, result_path};

/// Runs `profile` over every trace in `folder` whose result file the policy
/// says to (re)compute, passing it the trace path and the result path to
/// write. Traces are visited in name order. With `keep_going`, a failed
/// trace is logged and the batch moves on; otherwise the first failure
/// aborts the batch.
pub fn for_each_trace<F>(
    folder: &Path,
    outfolder: &Path,
    suffix: &str,
    policy: OverwritePolicy,
    keep_going: bool,
    mut profile: F,
) -> Result<()>
where
    F: FnMut(&Path, &Path) -> Result<()>,
{
    for trace in list_trace_files(folder)? {
        let outfile = result_path(outfolder, &trace, suffix)?;
        if !policy.should_process(&outfile) {
            debug!("Skipping {}: result already present", trace.display());
            continue;
        }
        if let Err(err) = profile(&trace, &outfile) {
            if !keep_going {
                return Err(err.context(format!("failed to profile {}", trace.display())));
            }
            error!("Skipping {}: {:#}", trace.display(), err);
        }
    }
    Ok(())
}
