//! Datasets loaded for the duration of a request.
//!
//! Each loaded spectrum gets a handle from a counter owned by the
//! session. A [`ScratchDataset`] deletes its dataset when dropped, so a
//! temporary load never outlives the operation that needed it.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::Result;

use super::SpectrumHeader;

/// Handle of a loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatasetId(u64);

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dataset-{}", self.0)
    }
}

/// Loaded spectra, keyed by handle.
#[derive(Debug, Default)]
pub struct DataSession {
    next: u64,
    datasets: BTreeMap<DatasetId, SpectrumHeader>,
}

impl DataSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the spectrum at `path` and return its handle.
    pub fn load(&mut self, path: &Path) -> Result<DatasetId> {
        let header = SpectrumHeader::read(path)?;
        Ok(self.insert(header))
    }

    /// Add an already-read header.
    pub fn insert(&mut self, header: SpectrumHeader) -> DatasetId {
        let id = DatasetId(self.next);
        self.next += 1;
        self.datasets.insert(id, header);
        tracing::debug!("loaded {}", id);
        id
    }

    pub fn get(&self, id: DatasetId) -> Option<&SpectrumHeader> {
        self.datasets.get(&id)
    }

    /// Remove a dataset. Unknown handles are ignored.
    pub fn delete(&mut self, id: DatasetId) {
        if self.datasets.remove(&id).is_some() {
            tracing::debug!("deleted {}", id);
        }
    }

    /// Number of loaded datasets.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Load `path` as a dataset that is deleted when the guard drops.
    pub fn scratch(&mut self, path: &Path) -> Result<ScratchDataset<'_>> {
        let id = self.load(path)?;
        Ok(ScratchDataset { session: self, id })
    }
}

/// A dataset removed from its session on drop.
#[derive(Debug)]
pub struct ScratchDataset<'a> {
    session: &'a mut DataSession,
    id: DatasetId,
}

impl ScratchDataset<'_> {
    pub fn id(&self) -> DatasetId {
        self.id
    }

    pub fn header(&self) -> Option<&SpectrumHeader> {
        self.session.get(self.id)
    }
}

impl Drop for ScratchDataset<'_> {
    fn drop(&mut self) {
        self.session.delete(self.id);
    }
}
