//! Source Loader: configuration sources and the unified key model.
//!
//! - [`entities`] - environments, source tags and formats, [`ConfigKey`]
//! - [`parsing`] - line-level parsing of properties files and env templates
//! - [`loader`] - merging parsed sources into ConfigKeys and type inference

pub mod entities;
pub mod loader;
pub mod parsing;

pub use entities::{ConfigKey, ConfigSource, Environment, SourceFormat, SourceTag, ValueType};
pub use loader::{infer_type, load_keys};
pub use parsing::{SourceEntry, parse_source};
