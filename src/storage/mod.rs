//! Storage module
//!
//! Object store locations used as both the JSON source and the Parquet
//! sink, plus the glob patterns used to select input objects.

mod glob;
mod location;

pub use glob::GlobPattern;
pub use location::StorageLocation;
