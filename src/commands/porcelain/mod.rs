//! Porcelain commands (user-facing operations)
//!
//! - `log`: Show commit history newer than a cutoff date

pub mod log;
