//! Core domain concepts shared across all subdomains.
//!
//! - [`error`] - the error taxonomy (malformed sources, unrecognized tables,
//!   unterminated environment views, ambiguous mappings) and the secret
//!   exposure warning
//! - [`string`] - UTF-8 safe string helpers and Markdown cell formatting

pub mod error;
pub mod string;
