//! Reference spectra.

pub mod header;
pub mod session;

pub use header::SpectrumHeader;
pub use session::{DataSession, DatasetId, ScratchDataset};
