//! Flat ancillary response.

use serde::Serialize;

use crate::grid::EnergyGrid;

/// An ARF with unit effective area in every bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatArf {
    energ_lo: Vec<f64>,
    energ_hi: Vec<f64>,
    specresp: Vec<f64>,
}

impl FlatArf {
    pub fn new(grid: &EnergyGrid) -> Self {
        Self {
            energ_lo: grid.lower().to_vec(),
            energ_hi: grid.upper().to_vec(),
            specresp: vec![1.0; grid.len()],
        }
    }

    pub fn energ_lo(&self) -> &[f64] {
        &self.energ_lo
    }

    pub fn energ_hi(&self) -> &[f64] {
        &self.energ_hi
    }

    /// Effective area per bin (cm^2).
    pub fn specresp(&self) -> &[f64] {
        &self.specresp
    }

    pub fn len(&self) -> usize {
        self.specresp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specresp.is_empty()
    }
}
