use std::path::Path;

use lazy_static::lazy_static;

use crate::error::StageError;
use crate::prelude::*;
use crate::profiler::{CommandBuilder, run_captured};

/// Symbol charged with flow-cache packet insertion in the profiled program.
/// The memory measurement of a report is the heap usage attributed to it.
pub const PACKET_INSERT_SYMBOL: &str = "(*FlowCache).addPacket";

lazy_static! {
    /// Fixed `go tool pprof` flag set: in-use space, text report, byte
    /// units, no node truncation.
    static ref PPROF_BASE_ARGS: Vec<String> = {
        [
            "tool",
            "pprof",
            "-inuse_space",
            "-text",
            "-unit",
            "b",
            "--nodefraction=0",
        ]
        .iter()
        .map(|x| x.to_string())
        .collect()
    };
}

/// Renders one raw heap profile into `go tool pprof`'s human-readable text
/// report.
pub fn render_report(raw_profile: &Path) -> Result<String> {
    let mut cmd = CommandBuilder::new("go");
    cmd.args(PPROF_BASE_ARGS.iter()).arg(raw_profile);
    debug!("Rendering report: {}", cmd.as_command_line());
    let output = run_captured(&cmd)?;
    String::from_utf8(output.stdout).context("pprof emitted a non-UTF-8 report")
}

/// Sums the bytes attributed to the packet-insertion routine across all
/// report lines naming it.
///
/// The measurement is the 4th whitespace-delimited column (cumulative
/// usage), a float with a trailing `B` unit. A report with no matching line
/// totals 0.0; a matching line with an unparsable token is fatal.
pub fn scrape_inuse_bytes(report: &str) -> Result<f64> {
    let mut total = 0.0;
    for line in report.lines() {
        if !line.contains(PACKET_INSERT_SYMBOL) {
            continue;
        }
        let token = line
            .split_whitespace()
            .nth(3)
            .ok_or_else(|| StageError::Parse {
                token: String::new(),
                line: line.to_string(),
            })?;
        let bytes: f64 = token
            .strip_suffix('B')
            .unwrap_or(token)
            .parse()
            .map_err(|_| StageError::Parse {
                token: token.to_string(),
                line: line.to_string(),
            })?;
        total += bytes;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const REPORT: &str = "\
File: mem_profile
Type: inuse_space
Showing nodes accounting for 1536.50B, 100% of 1536.50B total
      flat  flat%   sum%        cum   cum%
      512B 33.32% 33.32%       512B 33.32%  github.com/traffic-refinery/traffic-refinery/internal/flowstats.(*FlowCache).addPacket
         0     0% 33.32%    1024.50B 66.68%  runtime.main
";

    #[test]
    fn test_scrapes_cumulative_bytes() {
        assert_eq!(scrape_inuse_bytes(REPORT).unwrap(), 512.0);
    }

    #[rstest]
    #[case::empty_report("", 0.0)]
    #[case::no_matching_line("      512B 33.32% 33.32%       512B 33.32%  runtime.main\n", 0.0)]
    #[case::matching_lines_are_summed(
        "x x x 10B x (*FlowCache).addPacket\nx x x 20B x (*FlowCache).addPacket\n",
        30.0
    )]
    #[case::fractional_bytes("x x x 512.50B x (*FlowCache).addPacket\n", 512.5)]
    #[case::bare_zero_token("x x x 0 x (*FlowCache).addPacket\n", 0.0)]
    fn test_scrape_inuse_bytes(#[case] report: &str, #[case] expected: f64) {
        assert_eq!(scrape_inuse_bytes(report).unwrap(), expected);
    }

    #[test]
    fn test_malformed_token_is_a_parse_stage_error() {
        let report = "x x x 512kB x (*FlowCache).addPacket\n";
        let err = scrape_inuse_bytes(report).unwrap_err();
        match err.downcast_ref::<StageError>() {
            Some(StageError::Parse { token, .. }) => assert_eq!(token, "512kB"),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_short_matching_line_is_a_parse_stage_error() {
        let report = "(*FlowCache).addPacket\n";
        let err = scrape_inuse_bytes(report).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StageError>(),
            Some(StageError::Parse { .. })
        ));
    }
}
