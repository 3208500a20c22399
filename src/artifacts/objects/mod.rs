//! Git object types and operations
//!
//! Only the pieces needed to read commit history live here:
//!
//! - **Commit**: Snapshot metadata (tree, parent commits, author, committer, message)
//! - **Author**: Identity of the author or committer, optionally carrying a timestamp
//!
//! All objects share the Git object format `<type> <size>\0<content>` and are
//! addressed by the SHA-1 of that serialized form.

pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of an abbreviated object ID
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;
