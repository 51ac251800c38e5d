//! Record source module
//!
//! Reads typed records out of JSON-lines objects selected by a glob.
//!
//! # Overview
//!
//! - [`RecordSource::list`] resolves a glob to object paths, in path order
//! - [`RecordSource::stream`] lazily yields typed records, one object at a time
//! - [`RecordSource::read_all`] collects the stream

mod reader;

pub use reader::RecordSource;
