//! # braintrust-export
//!
//! Export Braintrust experiments and datasets to local CSV files, one file per
//! experiment/dataset, grouped in a directory per project.
//!
//! ## Pipeline
//!
//! 1. Resolve the project by name (`GET /project?project_name=...`)
//! 2. List its experiments, then its datasets
//! 3. Fetch each item's events (`GET /{kind}/{id}/fetch`)
//! 4. Flatten the events into a table, dropping `_pagination_key` and `_xact_id`
//! 5. Write `{output_dir}/{project}/{kind}_{item}.csv`
//!
//! ## Quick Start
//!
//! ```no_run
//! use braintrust_export::{Config, Exporter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         output_dir: "exports".into(),
//!         ..Config::new("sk-...", "My Project")
//!     };
//!
//!     let summary = Exporter::new(config)?.run().await?;
//!     for item in &summary.exported {
//!         println!("{} {} -> {}", item.kind, item.name, item.path.display());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Braintrust REST API client
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Export orchestration
pub mod exporter;
/// Event flattening
pub mod flatten;
/// Core types
pub mod types;
/// Output paths and CSV writing
pub mod writer;

// Re-export commonly used types
pub use client::ApiClient;
pub use config::{Config, FailurePolicy};
pub use error::{Error, Result, ToExitCode};
pub use exporter::{Exporter, KindReport};
pub use flatten::{RESERVED_COLUMNS, Table, flatten_events};
pub use types::{
    Event, ExportKind, ExportSummary, ExportedItem, Item, ItemFailure, Payload, Project,
};
