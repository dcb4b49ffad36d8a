//! Diagonal responses for a named instrument or a reference spectrum.
//!
//! [`mkdiagresp`] canonicalizes the instrument parameters, finds the
//! matching energy grid and builds a diagonal RMF with a flat ARF on it.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::grid::{resolve_grid, EboundsSource, EnergyGrid};
use crate::instruments::{resolve, GridSpec, InstrumentKey};
use crate::response::{build_response, DiagonalRmf, FlatArf, DEFAULT_ETHRESH};
use crate::spectrum::{DataSession, SpectrumHeader};

/// A spectrum whose header supplies the instrument parameters.
#[derive(Debug, Clone)]
pub enum RefSpec {
    /// A spectrum file, loaded only for the duration of the call.
    Path(PathBuf),
    /// Keywords already in memory.
    Header(SpectrumHeader),
}

/// Parameters of [`mkdiagresp`].
#[derive(Debug, Clone)]
pub struct DiagRespRequest {
    pub telescope: String,
    pub instrument: Option<String>,
    pub detector: Option<String>,
    pub filter: Option<String>,
    /// When set, replaces all the instrument fields above and `nchan`/`chantype`.
    pub refspec: Option<RefSpec>,
    pub chantype: Option<String>,
    pub nchan: Option<i64>,
    /// Replacement for non-positive lower energy edges; `None` disables it.
    pub ethresh: Option<f64>,
}

impl Default for DiagRespRequest {
    fn default() -> Self {
        Self {
            telescope: "Chandra".to_string(),
            instrument: Some("ACIS".to_string()),
            detector: None,
            filter: None,
            refspec: None,
            chantype: Some("PI".to_string()),
            nchan: None,
            ethresh: Some(DEFAULT_ETHRESH),
        }
    }
}

impl DiagRespRequest {
    /// The instrument key this request asks for, before canonicalization.
    pub fn instrument_key(&self) -> Result<InstrumentKey> {
        match &self.refspec {
            None => Ok(InstrumentKey {
                telescope: self.telescope.clone(),
                instrument: self.instrument.clone(),
                detector: self.detector.clone(),
                filter: self.filter.clone(),
                channel_count: self.nchan,
                channel_type: self.chantype.clone(),
            }),
            Some(RefSpec::Header(header)) => Ok(key_from_header(header)),
            Some(RefSpec::Path(path)) => {
                let mut session = DataSession::new();
                let scratch = session.scratch(path)?;
                let key = scratch.header().map(key_from_header).unwrap_or_default();
                Ok(key)
            }
        }
    }
}

fn key_from_header(header: &SpectrumHeader) -> InstrumentKey {
    let text = |key: &str| header.get_str(key).map(|v| v.trim().to_string());
    InstrumentKey {
        telescope: text("TELESCOP").unwrap_or_default(),
        instrument: text("INSTRUME"),
        detector: text("DETNAM"),
        filter: text("FILTER"),
        channel_count: header.get_i64("DETCHANS"),
        channel_type: text("CHANTYPE"),
    }
}

/// A diagonal response and what it was built from.
#[derive(Debug, Clone, Serialize)]
pub struct DiagResponse {
    /// Canonical instrument parameters.
    pub key: InstrumentKey,
    /// Lookup-table block the grid came from; `None` for analytic grids.
    pub block: Option<String>,
    #[serde(skip)]
    pub grid: EnergyGrid,
    #[serde(skip)]
    pub rmf: DiagonalRmf,
    #[serde(skip)]
    pub arf: FlatArf,
}

/// Build a diagonal RMF and flat ARF for the requested instrument.
///
/// # Errors
///
/// - `MissingParameter`, `InvalidParameter` or `UnsuitableInstrument`
///   from canonicalization
/// - `Configuration` if no grid exists for the instrument, or if the grid
///   starts at zero energy and `ethresh` is unusable
/// - `Build` if the response cannot be constructed
pub fn mkdiagresp(request: &DiagRespRequest, source: &dyn EboundsSource) -> Result<DiagResponse> {
    let input = request.instrument_key()?;
    let resolved = resolve(&input)?;
    tracing::debug!("canonical instrument: {:?}", resolved.key);

    let grid = resolve_grid(&resolved, source)?;
    let (rmf, arf) = build_response(&grid, request.ethresh)?;

    let analytic = matches!(
        resolved.spec.map(|s| &s.grid),
        Some(GridSpec::Analytic { .. })
    );
    let block = (!analytic).then(|| resolved.key.block_name());

    Ok(DiagResponse {
        key: resolved.key,
        block,
        grid,
        rmf,
        arf,
    })
}
