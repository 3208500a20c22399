use crate::areas::repository::Repository;
use crate::artifacts::log::commit_filter::CommitFilter;
use crate::artifacts::log::date_filter::{AuthorDateFilter, CommitterDateFilter};
use crate::artifacts::log::rev_list::{RevCommit, RevList};
use colored::Colorize;

/// Which identity's timestamp is compared against the cutoff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateField {
    #[default]
    Author,
    Committer,
}

#[derive(Debug, Clone)]
pub struct SinceOptions {
    /// Milliseconds since the Unix epoch
    pub cutoff: i64,
    pub date_field: DateField,
    pub stop: bool,
    pub oneline: bool,
}

impl SinceOptions {
    pub fn filter(&self) -> Box<dyn CommitFilter> {
        match self.date_field {
            DateField::Author => Box::new(AuthorDateFilter::author(self.cutoff).with_stop(self.stop)),
            DateField::Committer => {
                Box::new(CommitterDateFilter::committer(self.cutoff).with_stop(self.stop))
            }
        }
    }
}

impl Repository {
    /// Show the first-parent history of HEAD, limited to commits dated at or
    /// after the cutoff
    pub fn log_since(&self, opts: &SinceOptions) -> anyhow::Result<()> {
        let start = self.refs().read_head()?;

        for commit in RevList::new(self.database(), start, opts.filter()) {
            let commit = commit?;

            if opts.oneline {
                self.show_commit_oneline(&commit)?;
            } else {
                self.show_commit_medium(&commit)?;
            }
        }

        Ok(())
    }

    fn show_commit_oneline(&self, commit: &RevCommit<'_>) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{} {}",
            commit.oid().to_short_oid().yellow(),
            commit.body()?.short_message()
        )?;

        Ok(())
    }

    fn show_commit_medium(&self, commit: &RevCommit<'_>) -> anyhow::Result<()> {
        let body = commit.body()?;

        writeln!(
            self.writer(),
            "{}",
            format!("commit {}", commit.oid()).yellow()
        )?;
        if let Some(author) = body.author() {
            writeln!(self.writer(), "Author: {}", author.display_name())?;
            if let Some(date) = author.readable_timestamp() {
                writeln!(self.writer(), "Date:   {date}")?;
            }
        }
        writeln!(self.writer())?;
        for message_line in body.message().lines() {
            writeln!(self.writer(), "    {message_line}")?;
        }
        writeln!(self.writer())?;

        Ok(())
    }
}
