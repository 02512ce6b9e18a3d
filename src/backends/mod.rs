//! Backends module - File enumeration, usage collection and command handlers
//!
//! Provides:
//! - scan: Candidate file enumeration with the ignore crate
//! - collect: Running a finder over every candidate
//! - find: The find, unused and kind commands

pub mod collect;
pub mod find;
pub mod scan;
