//! Telescope/instrument canonicalization.
//!
//! [`resolve`] turns a caller-supplied [`InstrumentKey`] into the canonical
//! key that names a lookup-table block, using the embedded telescope
//! [`catalog`].

pub mod key;
pub mod resolve;
pub mod table;

pub use key::InstrumentKey;
pub use resolve::{resolve, Resolved};
pub use table::{
    catalog, find_telescope, AnalyticBinning, DetectorRule, GridSpec, InstrumentAlias,
    InstrumentSpec, TelescopeSpec, Unsuitable,
};
