//! Synthesis of diagonal responses.
//!
//! [`build_response`] turns an energy grid into a [`DiagonalRmf`] and a
//! [`FlatArf`] sharing its bins; [`write_rmf`] and [`write_arf`] save them
//! in OGIP format.

pub mod arf;
pub mod ogip;
pub mod rmf;
pub mod verbosity;

use crate::error::{CiaoError, Result};
use crate::grid::EnergyGrid;

pub use arf::FlatArf;
pub use ogip::{write_arf, write_rmf};
pub use rmf::DiagonalRmf;
pub use verbosity::Verbosity;

/// Threshold used when the caller does not pick one.
pub const DEFAULT_ETHRESH: f64 = 1e-12;

/// Build the RMF/ARF pair for `grid`.
///
/// A lower edge of zero or below needs `ethresh`: those edges are raised
/// to it in both responses, with a warning. The RMF's channel boundaries
/// keep the original grid.
///
/// # Errors
///
/// - `Configuration` when `ethresh` is given but not positive, or when a
///   threshold is needed and `ethresh` is absent
/// - `Build` for any other construction failure
pub fn build_response(grid: &EnergyGrid, ethresh: Option<f64>) -> Result<(DiagonalRmf, FlatArf)> {
    let energy = apply_threshold(grid, ethresh)?;
    let rmf = DiagonalRmf::new(&energy, grid);
    let arf = FlatArf::new(&energy);

    if verbosity::enabled(Verbosity::Info) {
        tracing::info!(
            "built diagonal response with {} channels starting at {}",
            rmf.detchans(),
            rmf.offset()
        );
    }
    Ok((rmf, arf))
}

const ETHRESH_ADVICE: &str = "Set 'ethresh' to a float value greater than zero and not None.";

fn apply_threshold(grid: &EnergyGrid, ethresh: Option<f64>) -> Result<EnergyGrid> {
    if !grid.has_non_positive_edge() {
        return match ethresh {
            Some(t) if !(t > 0.0) => Err(CiaoError::config(format!(
                "ethresh must be greater than zero, not {}.  {}",
                t, ETHRESH_ADVICE
            ))),
            _ => Ok(grid.clone()),
        };
    }

    let threshold = ethresh.filter(|t| *t > 0.0).ok_or_else(|| {
        CiaoError::config(format!(
            "The energy grid has an energy bin with value <= 0.  {}",
            ETHRESH_ADVICE
        ))
    })?;

    let minimum = grid.lower().iter().copied().fold(f64::INFINITY, f64::min);
    if verbosity::enabled(Verbosity::Warn) {
        tracing::warn!(
            "The minimum ENERG_LO was {} and has been replaced by {}",
            minimum,
            threshold
        );
    }

    let lower = grid
        .lower()
        .iter()
        .map(|&e| if e <= 0.0 { threshold } else { e })
        .collect();
    EnergyGrid::new(lower, grid.upper().to_vec(), grid.offset())
}
