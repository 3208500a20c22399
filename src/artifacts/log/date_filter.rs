//! Date-threshold commit filter
//!
//! A `DateFilter` includes commits until it meets one whose date of interest
//! falls before a fixed cutoff. Which date is "of interest" is left to a
//! `DateExtractor`: the author date, the committer date, or any closure. The
//! comparison itself never looks at which field was chosen.
//!
//! A commit with no date (no identity, or an identity without a timestamp) is
//! treated as too old and excluded. Errors raised while resolving the date,
//! such as failed object reads, are returned untouched.

use crate::artifacts::log::commit_filter::{CommitFilter, FilterError};
use crate::artifacts::log::rev_list::RevCommit;
use crate::artifacts::objects::commit::Author;
use chrono::{DateTime, FixedOffset, TimeZone};

/// Source of the date a `DateFilter` compares against its cutoff
pub trait DateExtractor {
    fn extract_date(
        &self,
        commit: &RevCommit<'_>,
    ) -> anyhow::Result<Option<DateTime<FixedOffset>>>;
}

/// Timestamp carried by an optional identity
pub fn identity_date(identity: Option<&Author>) -> Option<DateTime<FixedOffset>> {
    identity.and_then(Author::timestamp)
}

/// Compares the author date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorDate;

impl DateExtractor for AuthorDate {
    fn extract_date(
        &self,
        commit: &RevCommit<'_>,
    ) -> anyhow::Result<Option<DateTime<FixedOffset>>> {
        Ok(identity_date(commit.body()?.author()))
    }
}

/// Compares the committer date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitterDate;

impl DateExtractor for CommitterDate {
    fn extract_date(
        &self,
        commit: &RevCommit<'_>,
    ) -> anyhow::Result<Option<DateTime<FixedOffset>>> {
        Ok(identity_date(commit.body()?.committer()))
    }
}

/// Closure-backed extractor, see [`extract_with`]
#[derive(Clone, Copy)]
pub struct ExtractWith<F>(F);

/// Wrap a closure as a `DateExtractor`
pub fn extract_with<F>(extract: F) -> ExtractWith<F>
where
    F: Fn(&RevCommit<'_>) -> anyhow::Result<Option<DateTime<FixedOffset>>>,
{
    ExtractWith(extract)
}

impl<F> DateExtractor for ExtractWith<F>
where
    F: Fn(&RevCommit<'_>) -> anyhow::Result<Option<DateTime<FixedOffset>>>,
{
    fn extract_date(
        &self,
        commit: &RevCommit<'_>,
    ) -> anyhow::Result<Option<DateTime<FixedOffset>>> {
        (self.0)(commit)
    }
}

/// Includes commits dated at or after a cutoff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFilter<E> {
    /// Milliseconds since the Unix epoch
    time: i64,
    extractor: E,
    stop: bool,
}

pub type AuthorDateFilter = DateFilter<AuthorDate>;
pub type CommitterDateFilter = DateFilter<CommitterDate>;

impl<E: DateExtractor> DateFilter<E> {
    pub fn new(time: i64, extractor: E) -> Self {
        DateFilter {
            time,
            extractor,
            stop: false,
        }
    }

    /// Create a filter whose cutoff is `date`, which must be present
    pub fn from_date<Tz: TimeZone>(
        date: Option<DateTime<Tz>>,
        extractor: E,
    ) -> Result<Self, FilterError> {
        let date =
            date.ok_or_else(|| FilterError::InvalidArgument("Date cannot be null".to_string()))?;

        Ok(Self::new(date.timestamp_millis(), extractor))
    }

    /// End the walk at the first excluded commit instead of skipping it
    pub fn with_stop(mut self, stop: bool) -> Self {
        self.stop = stop;
        self
    }

    pub fn cutoff(&self) -> i64 {
        self.time
    }
}

impl AuthorDateFilter {
    pub fn author(time: i64) -> Self {
        Self::new(time, AuthorDate)
    }
}

impl CommitterDateFilter {
    pub fn committer(time: i64) -> Self {
        Self::new(time, CommitterDate)
    }
}

impl<E: DateExtractor> CommitFilter for DateFilter<E> {
    fn include(&self, commit: &RevCommit<'_>) -> anyhow::Result<bool> {
        let Some(date) = self.extractor.extract_date(commit)? else {
            return Ok(false);
        };

        Ok(date.timestamp_millis() >= self.time)
    }

    fn stops_walk(&self) -> bool {
        self.stop
    }
}
