//! Keywords of a reference spectrum.

use std::path::Path;

use crate::error::Result;
use crate::fits::{FitsFile, Header, HeaderValue};

/// Keyword values of a spectrum.
///
/// String values of `none` (any case) or empty read as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectrumHeader {
    header: Header,
}

impl SpectrumHeader {
    pub fn new(header: Header) -> Self {
        Self { header }
    }

    /// Read the keywords of the spectrum in `path`.
    ///
    /// Keywords of the spectrum extension override those of the primary
    /// header.
    pub fn read(path: &Path) -> Result<Self> {
        let file = FitsFile::open(path)?;
        let mut header = file.hdus()[0].header.clone();
        for (k, v) in file.spectrum_hdu().header.iter() {
            header.set(k, v.clone());
        }
        tracing::debug!("read {} keywords from {}", header.len(), path.display());
        Ok(Self { header })
    }

    /// Raw value of `key`, if present and not a null marker.
    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.header.get(key).filter(|v| match v {
            HeaderValue::Str(s) => !is_null(s),
            _ => true,
        })
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(HeaderValue::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(HeaderValue::as_i64)
    }

    pub fn set(&mut self, key: &str, value: impl Into<HeaderValue>) {
        self.header.set(key, value);
    }
}

impl<K: Into<String>, V: Into<HeaderValue>> FromIterator<(K, V)> for SpectrumHeader {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn is_null(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("none")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fits::{write_fits, Column, TableHdu};
    use tempfile::TempDir;

    #[test]
    fn none_and_empty_are_absent() {
        let header: SpectrumHeader = [("TELESCOP", "XMM"), ("DETNAM", "NONE"), ("FILTER", "")]
            .into_iter()
            .collect();
        assert_eq!(header.get_str("telescop"), Some("XMM"));
        assert_eq!(header.get_str("DETNAM"), None);
        assert_eq!(header.get_str("FILTER"), None);
        assert_eq!(header.get_str("CHANTYPE"), None);
    }

    #[test]
    fn numeric_values_survive() {
        let mut header = SpectrumHeader::default();
        header.set("DETCHANS", 1024i64);
        assert_eq!(header.get_i64("DETCHANS"), Some(1024));
    }

    #[test]
    fn reads_spectrum_extension_over_primary() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("src.pi");

        let mut spectrum = TableHdu::new("SPECTRUM");
        spectrum.header.set("TELESCOP", "ROSAT");
        spectrum.header.set("INSTRUME", "PSPCB");
        spectrum.header.set("DETCHANS", 256i64);
        spectrum.header.set("FILTER", "none");
        spectrum.push_column(Column::int16("CHANNEL", None, vec![1, 2]));
        spectrum.push_column(Column::int32("COUNTS", Some("count"), vec![5, 7]));
        write_fits(&path, &[spectrum], false).unwrap();

        let header = SpectrumHeader::read(&path).unwrap();
        assert_eq!(header.get_str("TELESCOP"), Some("ROSAT"));
        assert_eq!(header.get_i64("DETCHANS"), Some(256));
        assert_eq!(header.get_str("FILTER"), None);
        assert_eq!(header.get_str("EXTNAME"), Some("SPECTRUM"));
    }
}
