use crate::artifacts::log::rev_list::RevCommit;

/// Errors raised while configuring a commit filter
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Per-commit inclusion decision consulted by a history walk
pub trait CommitFilter {
    /// Decide whether `commit` is included in the walk's output.
    ///
    /// Resolving the commit body may read from the object store; such errors
    /// are returned to the walker as-is.
    fn include(&self, commit: &RevCommit<'_>) -> anyhow::Result<bool>;

    /// Whether an excluded commit ends the whole walk instead of being skipped
    fn stops_walk(&self) -> bool {
        false
    }
}

impl<T: CommitFilter + ?Sized> CommitFilter for &T {
    fn include(&self, commit: &RevCommit<'_>) -> anyhow::Result<bool> {
        (**self).include(commit)
    }

    fn stops_walk(&self) -> bool {
        (**self).stops_walk()
    }
}

impl<T: CommitFilter + ?Sized> CommitFilter for Box<T> {
    fn include(&self, commit: &RevCommit<'_>) -> anyhow::Result<bool> {
        (**self).include(commit)
    }

    fn stops_walk(&self) -> bool {
        (**self).stops_walk()
    }
}
