use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to load a [`PageConfig`](crate::config::PageConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config value `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// A single integrity problem found in the page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentIssue {
    EmptyField {
        list: &'static str,
        index: usize,
        field: &'static str,
    },
    DuplicateTitle {
        list: &'static str,
        title: String,
    },
    InvalidUrl {
        index: usize,
        url: String,
        reason: String,
    },
}

impl fmt::Display for ContentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { list, index, field } => {
                write!(f, "{list}[{index}]: empty `{field}`")
            }
            Self::DuplicateTitle { list, title } => {
                write!(f, "{list}: duplicate title {title:?}")
            }
            Self::InvalidUrl { index, url, reason } => {
                write!(f, "sources[{index}]: invalid URL {url:?} ({reason})")
            }
        }
    }
}

#[derive(Debug, Error)]
#[error("content check found {} issue(s)", issues.len())]
pub struct ContentError {
    pub issues: Vec<ContentIssue>,
}

/// The host refused to observe a region.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObserveError {
    #[error("viewport intersection detection is not available")]
    Unsupported,
    #[error("region `{0}` has no attached element")]
    UnknownRegion(String),
    #[error("intersection observer rejected the region: {0}")]
    Rejected(String),
}
