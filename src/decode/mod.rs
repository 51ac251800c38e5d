//! Record decoder module
//!
//! Turns JSON-lines object bodies into typed records.
//!
//! # Overview
//!
//! Every input kind declares its shape as a serde type. A document that does
//! not deserialize into that shape is an input error that names the object
//! and line it came from; nothing is coerced or skipped.

mod decoders;

pub use decoders::JsonlDecoder;
