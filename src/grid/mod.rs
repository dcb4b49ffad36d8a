//! Energy grids: bin edges in keV plus the first channel number.
//!
//! A grid comes either from an analytic rule ([`analytic`]) or from a
//! telescope's ebounds lookup table ([`lookup`]). [`resolve_grid`] picks
//! the right one for a canonical key.

pub mod analytic;
pub mod lookup;

use serde::Serialize;
use std::fmt;

use crate::error::{CiaoError, Result};
use crate::instruments::{GridSpec, Resolved};

pub use analytic::analytic_grid;
pub use lookup::{EboundsBlock, EboundsSource, FitsEbounds, MemoryEbounds};

/// Unit of the energy columns in a lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnergyUnit {
    Ev,
    Kev,
    Mev,
    Gev,
}

impl EnergyUnit {
    /// Parse an EUNIT value. A missing keyword means keV.
    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value.map(str::trim) {
            None | Some("") | Some("keV") => Ok(Self::Kev),
            Some("eV") => Ok(Self::Ev),
            Some("MeV") => Ok(Self::Mev),
            Some("GeV") => Ok(Self::Gev),
            Some(other) => Err(CiaoError::config(format!(
                "Unsupported energy unit '{}'; expected eV, keV, MeV or GeV",
                other
            ))),
        }
    }

    /// Convert a value in this unit to keV.
    pub fn to_kev(self, value: f64) -> f64 {
        match self {
            Self::Ev => value / 1_000.0,
            Self::Kev => value,
            Self::Mev => value * 1_000.0,
            Self::Gev => value * 1_000_000.0,
        }
    }
}

impl fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ev => "eV",
            Self::Kev => "keV",
            Self::Mev => "MeV",
            Self::Gev => "GeV",
        };
        f.write_str(label)
    }
}

/// Lower and upper bin edges (keV) and the first channel number.
///
/// Edges have equal, non-zero length; every bin has `lower < upper` and
/// both edge sequences are non-decreasing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyGrid {
    lower: Vec<f64>,
    upper: Vec<f64>,
    offset: i64,
}

impl EnergyGrid {
    /// Build a grid, checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns `Build` if the edges are empty, of different lengths, or
    /// out of order.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>, offset: i64) -> Result<Self> {
        if lower.is_empty() {
            return Err(build_err("the energy grid is empty"));
        }
        if lower.len() != upper.len() {
            return Err(build_err(format!(
                "the energy grid has {} lower edges but {} upper edges",
                lower.len(),
                upper.len()
            )));
        }
        if let Some(i) = (0..lower.len()).find(|&i| !(lower[i] < upper[i])) {
            return Err(build_err(format!(
                "energy bin {} has lower edge {} not below upper edge {}",
                i, lower[i], upper[i]
            )));
        }
        if lower.windows(2).any(|w| w[1] < w[0]) || upper.windows(2).any(|w| w[1] < w[0]) {
            return Err(build_err("the energy grid is not monotonically increasing"));
        }

        Ok(Self { lower, upper, offset })
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Channel number of the first bin.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// Always false for a constructed grid.
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Channel numbers, starting at the offset.
    pub fn channels(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.len() as i64).map(move |i| self.offset + i)
    }

    /// Whether any lower edge is zero or negative.
    pub fn has_non_positive_edge(&self) -> bool {
        self.lower.iter().any(|&e| e <= 0.0)
    }
}

fn build_err(message: impl Into<String>) -> CiaoError {
    CiaoError::Build {
        message: message.into(),
    }
}

/// Produce the grid for a resolved key.
///
/// Analytic telescopes compute it; everything else, including telescopes
/// outside the table, reads `source`.
pub fn resolve_grid(resolved: &Resolved, source: &dyn EboundsSource) -> Result<EnergyGrid> {
    let key = &resolved.key;
    match resolved.spec.map(|s| &s.grid) {
        Some(GridSpec::Analytic { offset, chantypes }) => {
            let chantype = key.channel_type.as_deref().unwrap_or_default();
            let binning = chantypes
                .iter()
                .find(|b| b.name.eq_ignore_ascii_case(chantype))
                .ok_or_else(|| {
                    CiaoError::config(format!(
                        "No analytic energy grid for {} channel type '{}'",
                        key.telescope, chantype
                    ))
                })?;
            tracing::debug!("computing {} {} grid", key.telescope, binning.name);
            analytic_grid(*offset, binning)
        }
        _ => {
            let table = key.telescope.to_lowercase();
            let block = key.block_name();
            tracing::debug!("reading block {} of the {} lookup table", block, table);
            source.block(&table, &block)?.into_grid()
        }
    }
}
