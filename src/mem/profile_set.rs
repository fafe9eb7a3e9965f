use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use itertools::Itertools;

use crate::prelude::*;

/// Tags recognized when deriving a report key from a bare configuration
/// path.
const RECOGNIZED_TAGS: [&str; 3] = ["general", "tcp", "video"];

/// One memory-profiling variant: a traffic configuration file and the key
/// its measurements are reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileConfig {
    pub key: String,
    pub path: PathBuf,
}

impl ProfileConfig {
    pub fn new(key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
        }
    }

    /// The stock profiling set: the general, TCP and video traffic
    /// configurations shipped with the profiled program.
    pub fn default_set() -> Vec<Self> {
        vec![
            Self::new("nmconfig_general", "../test/config/trconfig_general.json"),
            Self::new("nmconfig_tcp", "../test/config/trconfig_tcp.json"),
            Self::new("nmconfig_video", "../test/config/trconfig_video.json"),
        ]
    }
}

impl FromStr for ProfileConfig {
    type Err = Error;

    /// Parses `key=path`, or a bare `path` whose key is derived from the one
    /// recognized tag the path contains (`…/trconfig_tcp.json` maps to
    /// `nmconfig_tcp`). Paths matching zero or several tags are rejected
    /// rather than guessed at.
    fn from_str(s: &str) -> Result<Self> {
        if let Some((key, path)) = s.split_once('=') {
            if key.is_empty() || path.is_empty() {
                bail!("profile configuration `{s}` must be of the form key=path");
            }
            return Ok(Self::new(key, path));
        }

        let tags: Vec<&str> = RECOGNIZED_TAGS
            .iter()
            .copied()
            .filter(|tag| s.contains(tag))
            .collect();
        match tags.as_slice() {
            [tag] => Ok(Self::new(format!("nmconfig_{tag}"), s)),
            [] => bail!(
                "cannot derive a key for `{s}`: no recognized tag ({}); pass an explicit key=path",
                RECOGNIZED_TAGS.iter().join(", ")
            ),
            _ => bail!(
                "configuration path `{s}` is ambiguous (tags {}); pass an explicit key=path",
                tags.iter().join(", ")
            ),
        }
    }
}

impl fmt::Display for ProfileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_explicit_key_and_path() -> Result<()> {
        let config: ProfileConfig = "nmconfig_tcp=conf/custom.json".parse()?;
        assert_eq!(config.key, "nmconfig_tcp");
        assert_eq!(config.path, PathBuf::from("conf/custom.json"));
        Ok(())
    }

    #[rstest]
    #[case::tcp("../test/config/trconfig_tcp.json", "nmconfig_tcp")]
    #[case::video("../test/config/trconfig_video.json", "nmconfig_video")]
    #[case::general("../test/config/trconfig_general.json", "nmconfig_general")]
    fn test_key_derived_from_bare_path(#[case] path: &str, #[case] expected_key: &str) {
        let config: ProfileConfig = path.parse().unwrap();
        assert_eq!(config.key, expected_key);
        assert_eq!(config.path, PathBuf::from(path));
    }

    #[test]
    fn test_unrecognized_bare_path_is_rejected() {
        let res = "conf/trconfig_custom.json".parse::<ProfileConfig>();
        assert!(res.is_err());
    }

    #[test]
    fn test_ambiguous_bare_path_is_rejected() {
        let res = "conf/trconfig_tcp_video.json".parse::<ProfileConfig>();
        assert!(res.is_err());
    }

    #[test]
    fn test_display_round_trips() -> Result<()> {
        for config in ProfileConfig::default_set() {
            let reparsed: ProfileConfig = config.to_string().parse()?;
            assert_eq!(reparsed, config);
        }
        Ok(())
    }

    #[test]
    fn test_default_set_keys() {
        let keys: Vec<_> = ProfileConfig::default_set()
            .into_iter()
            .map(|config| config.key)
            .collect();
        assert_eq!(keys, vec!["nmconfig_general", "nmconfig_tcp", "nmconfig_video"]);
    }
}
