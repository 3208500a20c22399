use crate::artifacts::log::commit_filter::CommitFilter;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::cell::OnceCell;
use std::collections::HashMap;

/// Macro for debug logging that is enabled with the debug_filter feature flag
///
/// # Usage
/// ```rust,ignore
/// debug_log!("Excluded commit {}", commit_id);
/// ```
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_filter")]
        {
            eprintln!($($arg)*);
        }
    };
}

/// Anything commits can be read from by object ID
pub trait CommitSource {
    fn load_commit(&self, oid: &ObjectId) -> anyhow::Result<Commit>;
}

impl CommitSource for HashMap<ObjectId, Commit> {
    fn load_commit(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        self.get(oid)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Commit object not found: {}", oid.as_ref()))
    }
}

/// Commit handle whose body is read from its source on first use
pub struct RevCommit<'s> {
    oid: ObjectId,
    source: &'s dyn CommitSource,
    body: OnceCell<Commit>,
}

impl<'s> RevCommit<'s> {
    pub fn new(oid: ObjectId, source: &'s dyn CommitSource) -> Self {
        RevCommit {
            oid,
            source,
            body: OnceCell::new(),
        }
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    pub fn is_parsed(&self) -> bool {
        self.body.get().is_some()
    }

    /// Parsed commit, loading it from the source if needed
    pub fn body(&self) -> anyhow::Result<&Commit> {
        if let Some(body) = self.body.get() {
            return Ok(body);
        }

        let commit = self.source.load_commit(&self.oid)?;
        Ok(self.body.get_or_init(|| commit))
    }

    pub fn into_body(self) -> anyhow::Result<Commit> {
        self.body()?;
        self.body
            .into_inner()
            .ok_or_else(|| anyhow::anyhow!("Commit {} was not loaded", self.oid.as_ref()))
    }
}

impl std::fmt::Debug for RevCommit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevCommit")
            .field("oid", &self.oid)
            .field("body", &self.body.get())
            .finish()
    }
}

/// First-parent history walk from `start`, yielding the commits `filter` includes
#[derive(new)]
pub struct RevList<'s, F> {
    source: &'s dyn CommitSource,
    start: Option<ObjectId>,
    filter: F,
}

impl<'s, F: CommitFilter> IntoIterator for RevList<'s, F> {
    type Item = anyhow::Result<RevCommit<'s>>;
    type IntoIter = RevListIntoIter<'s, F>;

    fn into_iter(self) -> Self::IntoIter {
        RevListIntoIter {
            source: self.source,
            next_oid: self.start,
            filter: self.filter,
        }
    }
}

pub struct RevListIntoIter<'s, F> {
    source: &'s dyn CommitSource,
    next_oid: Option<ObjectId>,
    filter: F,
}

impl<'s, F: CommitFilter> Iterator for RevListIntoIter<'s, F> {
    type Item = anyhow::Result<RevCommit<'s>>;

    fn next(&mut self) -> Option<Self::Item> {
        // taking the cursor up front ends the walk after an error
        while let Some(oid) = self.next_oid.take() {
            let commit = RevCommit::new(oid, self.source);

            let included = match self.filter.include(&commit) {
                Ok(included) => included,
                Err(error) => return Some(Err(error)),
            };

            if !included && self.filter.stops_walk() {
                debug_log!("Stopping walk at commit {}", commit.oid());
                return None;
            }

            self.next_oid = match commit.body() {
                Ok(body) => body.parent().cloned(),
                Err(error) => return Some(Err(error)),
            };

            if included {
                return Some(Ok(commit));
            }
            debug_log!("Skipping excluded commit {}", commit.oid());
        }

        None
    }
}
