//! OSM Map Wrangler - Shape OpenStreetMap XML exports into document-store records.
//!
//! This crate streams a map export (a tree of `node`, `way` and `relation`
//! elements), flattens each qualifying element into one JSON record with
//! table-driven value normalization applied to address fragments, and can
//! independently audit the export's shape and value distribution to
//! discover where those tables need entries.
//!
//! # Example
//!
//! ```
//! use osm_wrangler::normalize::normalize_street;
//!
//! assert_eq!(normalize_street("123 Main St"), "123 Main Street");
//! assert_eq!(normalize_street("45 Oak Ave S"), "45 Oak Avenue South");
//! ```
//!
//! # Architecture
//!
//! The wrangler is organized into several modules:
//!
//! - [`config`]: Constants and output-path derivation
//! - [`error`]: Error types and Result alias
//! - [`xml`]: Raw element trees and the streaming reader
//! - [`normalize`]: Fixed canonicalization tables and street rules
//! - [`address`]: Address assembly from `addr:` fragments
//! - [`shape`]: Element shaping into flat records
//! - [`audit`]: Shape and value inventories for data-quality review
//! - [`json`]: NDJSON record serialization and the atomic sink
//! - [`pipeline`]: Drivers for the processing and audit passes
//! - [`cli`]: Command-line interface

pub mod address;
pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod json;
pub mod normalize;
pub mod pipeline;
pub mod shape;
pub mod xml;

// Re-export main functions
pub use pipeline::{audit_map, process_map, ProcessOptions, ProcessStats};

// Re-export commonly used items
pub use audit::AuditSummary;
pub use error::{Result, WranglerError};
pub use shape::{shape, ElementKind, ShapedRecord};
pub use xml::{ElementReader, RawNode};
