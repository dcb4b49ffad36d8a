//! The telescope/instrument tuple that selects an energy grid.

use serde::Serialize;

/// Telescope, instrument and binning parameters of a spectrum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstrumentKey {
    pub telescope: String,
    pub instrument: Option<String>,
    pub detector: Option<String>,
    pub filter: Option<String>,
    /// Explicit sub-binning; `None` means the full-resolution grid.
    pub channel_count: Option<i64>,
    pub channel_type: Option<String>,
}

impl InstrumentKey {
    /// Create a key for a telescope with every other field absent.
    pub fn new(telescope: impl Into<String>) -> Self {
        Self {
            telescope: telescope.into(),
            ..Default::default()
        }
    }

    pub fn with_instrument(mut self, instrument: impl Into<String>) -> Self {
        self.instrument = Some(instrument.into());
        self
    }

    pub fn with_detector(mut self, detector: impl Into<String>) -> Self {
        self.detector = Some(detector.into());
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_channel_count(mut self, count: i64) -> Self {
        self.channel_count = Some(count);
        self
    }

    pub fn with_channel_type(mut self, chantype: impl Into<String>) -> Self {
        self.channel_type = Some(chantype.into());
        self
    }

    /// Name of the lookup-table block holding this key's grid.
    ///
    /// `instrument[-detector][/filter][_<n>chan][_chantype]`, leaving out
    /// absent parts.
    ///
    /// # Example
    ///
    /// ```
    /// use ciao_contrib::instruments::InstrumentKey;
    ///
    /// let key = InstrumentKey::new("ASCA")
    ///     .with_instrument("SIS0")
    ///     .with_detector("CCD1")
    ///     .with_channel_count(512)
    ///     .with_channel_type("PHA");
    /// assert_eq!(key.block_name(), "SIS0-CCD1_512chan_PHA");
    /// ```
    pub fn block_name(&self) -> String {
        let mut name = self.instrument.clone().unwrap_or_default();
        if let Some(det) = &self.detector {
            name.push('-');
            name.push_str(det);
        }
        if let Some(filter) = &self.filter {
            name.push('/');
            name.push_str(filter);
        }
        if let Some(n) = self.channel_count {
            name.push_str(&format!("_{}chan", n));
        }
        if let Some(chantype) = &self.channel_type {
            name.push('_');
            name.push_str(chantype);
        }
        name
    }
}
