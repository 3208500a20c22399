//! Date-threshold commit filtering over a git object database
//!
//! - `areas`: Object database, references and the repository that ties them together
//! - `artifacts`: Git objects, commit filters and first-parent history walks
//! - `commands`: User-facing operations built on the above

pub mod areas;
pub mod artifacts;
pub mod commands;
