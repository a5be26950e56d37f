//! Facsimile Server Library
//!
//! A self-hosted OCR reconstruction server: accepts an uploaded PDF, obtains
//! machine-readable text for it via a vision provider, re-renders that text
//! into a new paginated PDF, and publishes both artifacts to S3-compatible
//! blob storage.
//!
//! # Modules
//!
//! - `extract`: pluggable OCR extraction strategies (inline / raster / endpoint)
//! - `typeset`: deterministic text-to-PDF layout and serialization
//! - `pipeline`: the sequential ingest -> extract -> typeset -> store -> publish flow
//! - `storage`: S3-compatible blob store behind the `BlobStore` trait

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod storage;
pub mod typeset;
