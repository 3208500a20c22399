//! Commit history filtering
//!
//! - `commit_filter`: The `CommitFilter` trait consulted once per visited commit
//! - `date_filter`: Include commits until one dated before a fixed cutoff is reached
//! - `rev_list`: Lazily-loaded commit handles and a first-parent walker driving a filter
//! - `cutoff`: Parsing user-supplied cutoff dates into epoch milliseconds

pub mod commit_filter;
pub mod cutoff;
pub mod date_filter;
pub mod rev_list;
