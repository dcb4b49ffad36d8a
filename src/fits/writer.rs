//! Writing FITS files made of binary-table extensions.

use std::path::Path;

use crate::error::{CiaoError, Result};

use super::header::{Header, CARD_LEN};
use super::BLOCK_LEN;

/// Values of one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// 16-bit integers (`I`).
    Int16(Vec<i16>),
    /// 32-bit integers (`J`).
    Int32(Vec<i32>),
    /// Single precision (`E`).
    Float32(Vec<f32>),
    /// Double precision (`D`).
    Float64(Vec<f64>),
}

impl ColumnData {
    fn len(&self) -> usize {
        match self {
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
        }
    }

    fn tform(&self) -> &'static str {
        match self {
            Self::Int16(_) => "1I",
            Self::Int32(_) => "1J",
            Self::Float32(_) => "1E",
            Self::Float64(_) => "1D",
        }
    }

    fn width(&self) -> usize {
        match self {
            Self::Int16(_) => 2,
            Self::Int32(_) | Self::Float32(_) => 4,
            Self::Float64(_) => 8,
        }
    }

    fn write_row(&self, row: usize, out: &mut Vec<u8>) {
        match self {
            Self::Int16(v) => out.extend_from_slice(&v[row].to_be_bytes()),
            Self::Int32(v) => out.extend_from_slice(&v[row].to_be_bytes()),
            Self::Float32(v) => out.extend_from_slice(&v[row].to_be_bytes()),
            Self::Float64(v) => out.extend_from_slice(&v[row].to_be_bytes()),
        }
    }
}

/// A named column with an optional unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub unit: Option<String>,
    pub data: ColumnData,
}

impl Column {
    pub fn int16(name: &str, unit: Option<&str>, data: Vec<i16>) -> Self {
        Self::new(name, unit, ColumnData::Int16(data))
    }

    pub fn int32(name: &str, unit: Option<&str>, data: Vec<i32>) -> Self {
        Self::new(name, unit, ColumnData::Int32(data))
    }

    pub fn float32(name: &str, unit: Option<&str>, data: Vec<f32>) -> Self {
        Self::new(name, unit, ColumnData::Float32(data))
    }

    pub fn float64(name: &str, unit: Option<&str>, data: Vec<f64>) -> Self {
        Self::new(name, unit, ColumnData::Float64(data))
    }

    fn new(name: &str, unit: Option<&str>, data: ColumnData) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.map(String::from),
            data,
        }
    }
}

/// A BINTABLE extension to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct TableHdu {
    /// Extension name.
    pub extname: String,
    /// Extra keywords, written after the structural ones.
    pub header: Header,
    /// Columns in order.
    pub columns: Vec<Column>,
}

impl TableHdu {
    /// Create an empty table extension.
    pub fn new(extname: &str) -> Self {
        Self {
            extname: extname.to_string(),
            header: Header::new(),
            columns: Vec::new(),
        }
    }

    /// Append a column.
    pub fn push_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    fn rows(&self) -> usize {
        self.columns.first().map(|c| c.data.len()).unwrap_or(0)
    }

    fn structural_header(&self) -> Header {
        let row_len: usize = self.columns.iter().map(|c| c.data.width()).sum();

        let mut h = Header::new();
        h.set("XTENSION", "BINTABLE");
        h.set("BITPIX", 8i64);
        h.set("NAXIS", 2i64);
        h.set("NAXIS1", row_len as i64);
        h.set("NAXIS2", self.rows() as i64);
        h.set("PCOUNT", 0i64);
        h.set("GCOUNT", 1i64);
        h.set("TFIELDS", self.columns.len() as i64);
        for (i, col) in self.columns.iter().enumerate() {
            let n = i + 1;
            h.set(&format!("TTYPE{}", n), col.name.as_str());
            h.set(&format!("TFORM{}", n), col.data.tform());
            if let Some(unit) = &col.unit {
                h.set(&format!("TUNIT{}", n), unit.as_str());
            }
        }
        h.set("EXTNAME", self.extname.as_str());
        for (k, v) in self.header.iter() {
            h.set(k, v.clone());
        }
        h
    }
}

/// Encode a primary HDU followed by `tables`.
///
/// # Errors
///
/// Returns `Fits` if a table's columns differ in length.
pub fn encode(tables: &[TableHdu]) -> Result<Vec<u8>> {
    let mut out = Vec::new();

    let mut primary = Header::new();
    primary.set("SIMPLE", true);
    primary.set("BITPIX", 8i64);
    primary.set("NAXIS", 0i64);
    primary.set("EXTEND", true);
    write_header(&primary, &mut out);

    for table in tables {
        let rows = table.rows();
        if table.columns.iter().any(|c| c.data.len() != rows) {
            return Err(CiaoError::Fits {
                path: table.extname.clone().into(),
                message: "columns have different lengths".to_string(),
            });
        }

        write_header(&table.structural_header(), &mut out);

        let start = out.len();
        for row in 0..rows {
            for col in &table.columns {
                col.data.write_row(row, &mut out);
            }
        }
        pad(&mut out, start, 0);
    }

    Ok(out)
}

/// Write `tables` to `path`. An existing file is replaced only with `clobber`.
pub fn write_fits(path: &Path, tables: &[TableHdu], clobber: bool) -> Result<()> {
    if path.exists() && !clobber {
        return Err(CiaoError::Fits {
            path: path.to_path_buf(),
            message: "file exists and clobber is not set".to_string(),
        });
    }

    let bytes = encode(tables)?;
    std::fs::write(path, bytes)?;
    tracing::debug!("wrote {}", path.display());
    Ok(())
}

fn write_header(header: &Header, out: &mut Vec<u8>) {
    let start = out.len();
    for card in header.to_cards() {
        out.extend_from_slice(card.as_bytes());
    }
    out.extend_from_slice(format!("{:<width$}", "END", width = CARD_LEN).as_bytes());
    pad(out, start, b' ');
}

fn pad(out: &mut Vec<u8>, start: usize, fill: u8) {
    let len = out.len() - start;
    let padded = len.div_ceil(BLOCK_LEN) * BLOCK_LEN;
    out.resize(start + padded, fill);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn output_is_block_aligned() {
        let mut table = TableHdu::new("SPECRESP");
        table.push_column(Column::float32("SPECRESP", Some("cm**2"), vec![1.0; 100]));
        let bytes = encode(&[table]).unwrap();
        assert_eq!(bytes.len() % BLOCK_LEN, 0);
        assert!(bytes.starts_with(b"SIMPLE  ="));
    }

    #[test]
    fn header_cards_are_in_order() {
        let mut table = TableHdu::new("MATRIX");
        table.header.set("DETCHANS", 2i64);
        table.push_column(Column::int16("N_GRP", None, vec![1, 1]));
        let header = table.structural_header();

        let keys: Vec<&str> = header.iter().map(|(k, _)| k).collect();
        assert_eq!(&keys[..2], &["XTENSION", "BITPIX"]);
        assert_eq!(header.get_i64("NAXIS1"), Some(2));
        assert_eq!(header.get_str("TFORM1"), Some("1I"));
        assert_eq!(keys.last(), Some(&"DETCHANS"));
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let mut table = TableHdu::new("BAD");
        table.push_column(Column::int32("A", None, vec![1, 2]));
        table.push_column(Column::int32("B", None, vec![1]));
        assert!(encode(&[table]).is_err());
    }

    #[test]
    fn write_respects_clobber() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.fits");
        let table = TableHdu::new("EMPTY");

        write_fits(&path, std::slice::from_ref(&table), false).unwrap();
        assert!(write_fits(&path, std::slice::from_ref(&table), false).is_err());
        write_fits(&path, &[table], true).unwrap();
    }
}
