//! Shared helpers: formatting, parsing, file and command access

pub mod command;
pub mod file;
pub mod format;
pub mod parsing;
