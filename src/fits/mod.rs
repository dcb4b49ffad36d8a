//! Minimal FITS support.
//!
//! Covers what the response tools need: header keywords of every HDU,
//! scalar numeric columns of binary tables, and writing binary-table
//! extensions for OGIP response files.

pub mod header;
pub mod reader;
pub mod writer;

pub use header::{Header, HeaderValue};
pub use reader::{BinTable, FitsFile, Hdu};
pub use writer::{encode, write_fits, Column, ColumnData, TableHdu};

/// FITS logical record length.
pub const BLOCK_LEN: usize = 2880;
