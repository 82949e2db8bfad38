use serde::{Deserialize, Serialize};
use std::fmt;

/// Remote repository identity as returned by the lister.
///
/// Immutable snapshot: a new descriptor is produced every cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Repository name, unique within the account
    pub name: String,
    /// URL git clones and fetches from
    pub clone_url: String,
    /// Default branch reported by the remote, if any
    pub default_branch: Option<String>,
}

impl RepositoryDescriptor {
    /// Create a descriptor without a known default branch
    pub fn new(name: impl Into<String>, clone_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clone_url: clone_url.into(),
            default_branch: None,
        }
    }
}

/// One page of the account's repository listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryPage {
    /// Descriptors on this page, in remote order
    pub repositories: Vec<RepositoryDescriptor>,
    /// Page to request next; `None` when this was the last page
    pub next_page: Option<u32>,
}

/// Result of a successful mirror update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// Mirror was absent and has been cloned
    Cloned,
    /// Mirror already matched the remote
    UpToDate,
    /// Mirror was advanced to the remote head
    FastForwarded,
    /// Local history diverged; mirror left untouched
    Diverged,
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Cloned => "cloned",
            Self::UpToDate => "up_to_date",
            Self::FastForwarded => "fast_forwarded",
            Self::Diverged => "diverged",
        };
        f.write_str(s)
    }
}
