//! Core repository components
//!
//! - `database`: Loose-object database commits are read from
//! - `refs`: Reference resolution (HEAD, branches)
//! - `repository`: Coordinates the above and owns the output writer

pub mod database;
pub mod refs;
pub mod repository;
