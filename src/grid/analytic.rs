//! Grids computed from a uniform bin width.

use crate::error::Result;
use crate::instruments::AnalyticBinning;

use super::EnergyGrid;

/// `channels` bins of `bin_ev` each, starting at 0 keV.
///
/// Bin `i` spans `[i * w, i * w + w)` with `w` in keV.
pub fn analytic_grid(offset: i64, binning: &AnalyticBinning) -> Result<EnergyGrid> {
    let width = binning.bin_ev / 1_000.0;
    let lower: Vec<f64> = (0..binning.channels).map(|i| i as f64 * width).collect();
    let upper = lower.iter().map(|e| e + width).collect();
    EnergyGrid::new(lower, upper, offset)
}
