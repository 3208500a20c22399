//! Git data structures and algorithms
//!
//! - `log`: Commit filters and history traversal
//! - `objects`: Git object types (commit, author identity, object IDs)

pub mod log;
pub mod objects;
