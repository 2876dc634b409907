//! Batch export orchestration.
//!
//! - [`BatchExporterBuilder`]: fluent builder for a configured exporter
//! - [`ExportConfig`]: output directory, concurrency limit and render choices
//! - [`BatchExporter`]: renders every item of a batch and packages the PDFs
//!
//! # Example
//!
//! ```ignore
//! use placard::{BatchExporterBuilder, InMemoryExportStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryExportStore::load("store.json".as_ref())?);
//! let exporter = BatchExporterBuilder::new()
//!     .with_store(store)
//!     .with_output_dir("out")
//!     .build()?;
//!
//! let report = exporter.export_blocking(&"batch-1".into())?;
//! println!("{} of {} rendered", report.produced, report.requested);
//! ```

mod builder;
pub mod config;
pub mod default_layout;
mod orchestrator;
pub(crate) mod worker;

pub use builder::BatchExporterBuilder;
pub use config::ExportConfig;
pub use default_layout::default_layout;
pub use orchestrator::{BatchExportReport, BatchExporter, ItemFailure};
