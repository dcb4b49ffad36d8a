//! Ebounds lookup tables.
//!
//! Each telescope has one FITS file, `<telescope>-ebounds-lut.fits`, with
//! a binary-table block per instrument configuration. Blocks have the
//! columns CHANNEL, E_MIN and E_MAX; the EUNIT keyword gives the energy
//! unit.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{CiaoError, Result};
use crate::fits::FitsFile;

use super::{EnergyGrid, EnergyUnit};

const MISSING_TABLE: &str =
    "The specified 'telescope' parameter value is invalid; no corresponding lookup table is available.";

/// Raw contents of one lookup-table block.
#[derive(Debug, Clone, PartialEq)]
pub struct EboundsBlock {
    pub channels: Vec<i64>,
    pub e_min: Vec<f64>,
    pub e_max: Vec<f64>,
    /// EUNIT, if present.
    pub unit: Option<String>,
}

impl EboundsBlock {
    /// Convert to a keV grid whose offset is the smallest channel.
    pub fn into_grid(self) -> Result<EnergyGrid> {
        let unit = EnergyUnit::parse(self.unit.as_deref())?;
        let offset = self.channels.iter().copied().min().unwrap_or(0);
        let lower = self.e_min.into_iter().map(|e| unit.to_kev(e)).collect();
        let upper = self.e_max.into_iter().map(|e| unit.to_kev(e)).collect();
        EnergyGrid::new(lower, upper, offset)
    }
}

/// Where lookup-table blocks come from.
pub trait EboundsSource {
    /// Read `block` from the lookup table of `table` (lowercase telescope).
    ///
    /// # Errors
    ///
    /// Returns `Configuration` when the table or the block does not exist.
    fn block(&self, table: &str, block: &str) -> Result<EboundsBlock>;
}

/// Lookup tables stored as FITS files in one directory.
#[derive(Debug, Clone)]
pub struct FitsEbounds {
    dir: PathBuf,
}

impl FitsEbounds {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the lookup table for `table`.
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}-ebounds-lut.fits", table))
    }
}

impl EboundsSource for FitsEbounds {
    fn block(&self, table: &str, block: &str) -> Result<EboundsBlock> {
        let path = self.table_path(table);
        if !path.is_file() {
            tracing::debug!("no lookup table at {}", path.display());
            return Err(CiaoError::config(MISSING_TABLE));
        }

        let file = FitsFile::open(&path)?;
        let hdu = file.find(block).ok_or_else(|| missing_block(table, block))?;
        let data = hdu.table()?;

        Ok(EboundsBlock {
            channels: data.column_i64("CHANNEL")?,
            e_min: data.column_f64("E_MIN")?,
            e_max: data.column_f64("E_MAX")?,
            unit: hdu.header.get_str("EUNIT").map(|u| u.trim().to_string()),
        })
    }
}

/// Lookup tables held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryEbounds {
    tables: HashMap<String, Vec<(String, EboundsBlock)>>,
}

impl MemoryEbounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `block` to the table of `table`, creating the table if needed.
    pub fn insert(&mut self, table: &str, name: &str, block: EboundsBlock) {
        self.tables
            .entry(table.to_string())
            .or_default()
            .push((name.to_string(), block));
    }
}

impl EboundsSource for MemoryEbounds {
    fn block(&self, table: &str, block: &str) -> Result<EboundsBlock> {
        let blocks = self
            .tables
            .get(table)
            .ok_or_else(|| CiaoError::config(MISSING_TABLE))?;
        blocks
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(block))
            .map(|(_, b)| b.clone())
            .ok_or_else(|| missing_block(table, block))
    }
}

fn missing_block(table: &str, block: &str) -> CiaoError {
    CiaoError::config(format!(
        "The {} lookup table has no '{}' block; check the instrument parameters",
        table, block
    ))
}
