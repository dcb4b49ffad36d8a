//! Diagonal redistribution matrix.

use serde::Serialize;

use crate::grid::EnergyGrid;

/// An RMF mapping energy bin `i` entirely to channel `offset + i`.
///
/// The matrix energies may differ from the channel boundaries when a
/// threshold replaced non-positive lower edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagonalRmf {
    energ_lo: Vec<f64>,
    energ_hi: Vec<f64>,
    e_min: Vec<f64>,
    e_max: Vec<f64>,
    offset: i64,
}

impl DiagonalRmf {
    /// `energy` gives the matrix rows, `channels` the EBOUNDS and offset.
    pub fn new(energy: &EnergyGrid, channels: &EnergyGrid) -> Self {
        Self {
            energ_lo: energy.lower().to_vec(),
            energ_hi: energy.upper().to_vec(),
            e_min: channels.lower().to_vec(),
            e_max: channels.upper().to_vec(),
            offset: channels.offset(),
        }
    }

    pub fn energ_lo(&self) -> &[f64] {
        &self.energ_lo
    }

    pub fn energ_hi(&self) -> &[f64] {
        &self.energ_hi
    }

    /// Lower channel boundaries (keV).
    pub fn e_min(&self) -> &[f64] {
        &self.e_min
    }

    /// Upper channel boundaries (keV).
    pub fn e_max(&self) -> &[f64] {
        &self.e_max
    }

    /// First channel number.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Number of channels.
    pub fn detchans(&self) -> usize {
        self.e_min.len()
    }

    /// One group per energy.
    pub fn n_grp(&self) -> Vec<i64> {
        vec![1; self.energ_lo.len()]
    }

    /// First channel of each group.
    pub fn f_chan(&self) -> Vec<i64> {
        (0..self.energ_lo.len() as i64).map(|i| self.offset + i).collect()
    }

    /// Channels in each group.
    pub fn n_chan(&self) -> Vec<i64> {
        vec![1; self.energ_lo.len()]
    }

    /// Matrix elements, one per group.
    pub fn matrix(&self) -> Vec<f64> {
        vec![1.0; self.energ_lo.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_start_at_offset() {
        let grid = EnergyGrid::new(vec![0.1, 0.2, 0.3], vec![0.2, 0.3, 0.4], 0).unwrap();
        let rmf = DiagonalRmf::new(&grid, &grid);
        assert_eq!(rmf.f_chan(), vec![0, 1, 2]);
        assert_eq!(rmf.n_chan(), vec![1, 1, 1]);
        assert_eq!(rmf.matrix(), vec![1.0; 3]);
        assert_eq!(rmf.detchans(), 3);
    }

    #[test]
    fn ebounds_follow_channel_grid() {
        let channels = EnergyGrid::new(vec![0.0, 0.1], vec![0.1, 0.2], 1).unwrap();
        let energy = EnergyGrid::new(vec![1e-12, 0.1], vec![0.1, 0.2], 1).unwrap();
        let rmf = DiagonalRmf::new(&energy, &channels);
        assert_eq!(rmf.energ_lo()[0], 1e-12);
        assert_eq!(rmf.e_min()[0], 0.0);
        assert_eq!(rmf.f_chan(), vec![1, 2]);
    }
}
