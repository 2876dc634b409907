pub mod qr;
pub mod store;

pub use qr::{ErrorCorrection, QrError, QrImage, QrMatrix, QrProvider, QrRequest, StylePreset, UnavailableQrProvider};
pub use store::{Batch, BatchItem, ExportStore, InMemoryExportStore, StoreError, StoreSnapshot};
