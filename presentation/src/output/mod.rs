//! Report formatting

pub mod console;
pub mod diff;
pub mod formatter;
