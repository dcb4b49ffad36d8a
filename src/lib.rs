//! ciao-contrib - helper utilities for CIAO installations and X-ray
//! spectral analysis.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings loading and merging
//! - [`diagresp`] - Diagonal responses for a named instrument
//! - [`error`] - Error types and result aliases
//! - [`fits`] - Minimal FITS reading and writing
//! - [`grid`] - Energy grids, analytic or from lookup tables
//! - [`instruments`] - The telescope table and parameter canonicalization
//! - [`response`] - Diagonal RMF and flat ARF construction
//! - [`spectrum`] - Spectrum headers and the scratch data session
//! - [`ui`] - Terminal output
//! - [`versions`] - Installed and latest CIAO package versions
//!
//! # Example
//!
//! ```
//! use ciao_contrib::diagresp::{mkdiagresp, DiagRespRequest};
//! use ciao_contrib::grid::MemoryEbounds;
//!
//! // Chandra grids are computed, so no lookup tables are needed.
//! let request = DiagRespRequest::default();
//! let response = mkdiagresp(&request, &MemoryEbounds::new()).unwrap();
//! assert_eq!(response.rmf.detchans(), 1024);
//! ```

pub mod cli;
pub mod config;
pub mod diagresp;
pub mod error;
pub mod fits;
pub mod grid;
pub mod instruments;
pub mod response;
pub mod spectrum;
pub mod ui;
pub mod versions;

pub use error::{CiaoError, Result};
