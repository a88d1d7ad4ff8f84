//! Content registry subsystem
//!
//! The loader turns bundle bytes into an immutable, indexed `Registry`,
//! re-verifying the checksum and every rule's provenance on the way in.
//! Any defect aborts the entire load; a partially valid registry is never
//! published.
//!
//! # Design Principles
//!
//! - Content corruption is never ignored
//! - Readers never observe a half-built index: publication is a single
//!   pointer swap
//! - A failed load leaves the previously published registry serving

mod errors;
mod loader;
mod publisher;
mod registry;

pub use errors::{ContentIntegrityError, IntegrityErrorCode, LoadResult};
pub use loader::ContentLoader;
pub use publisher::RegistryPublisher;
pub use registry::Registry;
