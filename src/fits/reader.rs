//! Reading FITS files: headers of every HDU and scalar binary-table columns.

use std::path::{Path, PathBuf};

use crate::error::{CiaoError, Result};

use super::header::{Header, CARD_LEN};
use super::BLOCK_LEN;

/// One header-data unit.
#[derive(Debug, Clone)]
pub struct Hdu {
    /// Parsed header keywords.
    pub header: Header,
    data: Vec<u8>,
    path: PathBuf,
}

/// An opened FITS file.
#[derive(Debug, Clone)]
pub struct FitsFile {
    path: PathBuf,
    hdus: Vec<Hdu>,
}

impl FitsFile {
    /// Read and index every HDU of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `Fits` if it is not a
    /// well-formed FITS file.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(path, &bytes)
    }

    /// Parse FITS content already in memory. `path` is used in errors.
    pub fn from_bytes(path: &Path, bytes: &[u8]) -> Result<Self> {
        let mut hdus = Vec::new();
        let mut offset = 0;

        while offset + BLOCK_LEN <= bytes.len() {
            if !hdus.is_empty() && !starts_extension(&bytes[offset..]) {
                break;
            }

            let (header, header_len) = read_header(path, &bytes[offset..])?;
            offset += header_len;

            let data_len = data_size(path, &header)?;
            let end = offset
                .checked_add(data_len)
                .filter(|end| *end <= bytes.len())
                .ok_or_else(|| fits_err(path, "data unit is truncated"))?;
            let data = bytes[offset..end].to_vec();
            let padded = data_len.div_ceil(BLOCK_LEN) * BLOCK_LEN;
            offset = offset.saturating_add(padded).min(bytes.len());

            hdus.push(Hdu {
                header,
                data,
                path: path.to_path_buf(),
            });
        }

        if hdus.is_empty() {
            return Err(fits_err(path, "no header found"));
        }

        Ok(Self {
            path: path.to_path_buf(),
            hdus,
        })
    }

    /// The file this was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All HDUs, primary first.
    pub fn hdus(&self) -> &[Hdu] {
        &self.hdus
    }

    /// Find an extension by EXTNAME (case-insensitive).
    pub fn find(&self, extname: &str) -> Option<&Hdu> {
        self.hdus
            .iter()
            .find(|h| h.extname().is_some_and(|n| n.eq_ignore_ascii_case(extname)))
    }

    /// The HDU a spectrum's keywords live in.
    ///
    /// Prefers the `SPECTRUM` extension, else the first extension, else
    /// the primary HDU.
    pub fn spectrum_hdu(&self) -> &Hdu {
        self.find("SPECTRUM")
            .or_else(|| self.hdus.get(1))
            .unwrap_or(&self.hdus[0])
    }
}

impl Hdu {
    /// Value of EXTNAME, if present.
    pub fn extname(&self) -> Option<&str> {
        self.header.get_str("EXTNAME")
    }

    /// Interpret this HDU as a binary table.
    pub fn table(&self) -> Result<BinTable<'_>> {
        BinTable::new(self)
    }
}

/// Layout of one binary-table column.
#[derive(Debug, Clone, PartialEq)]
struct ColumnDesc {
    name: String,
    repeat: usize,
    code: char,
    offset: usize,
    scale: f64,
    zero: f64,
}

/// Read access to a BINTABLE extension.
#[derive(Debug)]
pub struct BinTable<'a> {
    hdu: &'a Hdu,
    columns: Vec<ColumnDesc>,
    row_len: usize,
    rows: usize,
}

impl<'a> BinTable<'a> {
    fn new(hdu: &'a Hdu) -> Result<Self> {
        let h = &hdu.header;
        if h.get_str("XTENSION").map(str::trim) != Some("BINTABLE") {
            return Err(fits_err(&hdu.path, "HDU is not a binary table"));
        }

        let row_len = required_usize(hdu, "NAXIS1")?;
        let rows = required_usize(hdu, "NAXIS2")?;
        let fields = required_usize(hdu, "TFIELDS")?;

        let mut columns = Vec::with_capacity(fields);
        let mut offset = 0;
        for n in 1..=fields {
            let name = h
                .get_str(&format!("TTYPE{}", n))
                .unwrap_or_default()
                .trim()
                .to_string();
            let form = h
                .get_str(&format!("TFORM{}", n))
                .ok_or_else(|| fits_err(&hdu.path, &format!("missing TFORM{}", n)))?;
            let (repeat, code) = parse_tform(form)
                .ok_or_else(|| fits_err(&hdu.path, &format!("unsupported TFORM{} '{}'", n, form)))?;

            let scale = h.get(&format!("TSCAL{}", n)).and_then(|v| v.as_f64()).unwrap_or(1.0);
            let zero = h.get(&format!("TZERO{}", n)).and_then(|v| v.as_f64()).unwrap_or(0.0);

            columns.push(ColumnDesc {
                name,
                repeat,
                code,
                offset,
                scale,
                zero,
            });
            offset = field_width(code, repeat)
                .and_then(|width| offset.checked_add(width))
                .ok_or_else(|| overflow(&hdu.path))?;
        }

        if offset > row_len {
            return Err(fits_err(&hdu.path, "columns are wider than NAXIS1"));
        }
        // Every cell lies inside row_len * rows bytes, so cell offsets below cannot overflow.
        let table_len = row_len.checked_mul(rows).ok_or_else(|| overflow(&hdu.path))?;
        if hdu.data.len() < table_len {
            return Err(fits_err(&hdu.path, "table data is truncated"));
        }

        Ok(Self {
            hdu,
            columns,
            row_len,
            rows,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Names of all columns, in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Read a scalar numeric column as floats (TSCAL/TZERO applied).
    pub fn column_f64(&self, name: &str) -> Result<Vec<f64>> {
        let col = self.column(name)?;
        let width = field_width(col.code, 1).unwrap_or_default();

        (0..self.rows)
            .map(|row| {
                let start = row * self.row_len + col.offset;
                let raw = &self.hdu.data[start..start + width];
                decode(col.code, raw)
                    .map(|v| v * col.scale + col.zero)
                    .ok_or_else(|| self.err(&format!("column {} is not numeric", col.name)))
            })
            .collect()
    }

    /// Read a scalar integer column.
    pub fn column_i64(&self, name: &str) -> Result<Vec<i64>> {
        Ok(self
            .column_f64(name)?
            .into_iter()
            .map(|v| v.round() as i64)
            .collect())
    }

    fn column(&self, name: &str) -> Result<&ColumnDesc> {
        let col = self
            .columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| self.err(&format!("no column named {}", name)))?;
        if col.repeat != 1 {
            return Err(self.err(&format!("column {} is not a scalar column", col.name)));
        }
        Ok(col)
    }

    fn err(&self, message: &str) -> CiaoError {
        fits_err(&self.hdu.path, message)
    }
}

fn fits_err(path: &Path, message: &str) -> CiaoError {
    CiaoError::Fits {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

fn overflow(path: &Path) -> CiaoError {
    fits_err(path, "header sizes overflow")
}

fn starts_extension(bytes: &[u8]) -> bool {
    bytes.starts_with(b"XTENSION")
}

/// Parse header cards up to END. Returns the header and its padded length.
fn read_header(path: &Path, bytes: &[u8]) -> Result<(Header, usize)> {
    let mut header = Header::new();
    let mut pos = 0;

    loop {
        if pos + CARD_LEN > bytes.len() {
            return Err(fits_err(path, "header has no END card"));
        }
        let raw = &bytes[pos..pos + CARD_LEN];
        pos += CARD_LEN;

        let card = std::str::from_utf8(raw)
            .ok()
            .filter(|c| c.is_ascii())
            .ok_or_else(|| fits_err(path, "header contains non-ASCII bytes"))?;

        if card.starts_with("END") && card[3..].trim().is_empty() {
            break;
        }
        if let Some((key, value)) = Header::parse_card(card) {
            header.set(&key, value);
        }
    }

    if header.get("SIMPLE").is_none() && header.get("XTENSION").is_none() {
        return Err(fits_err(path, "not a FITS file"));
    }

    Ok((header, pos.div_ceil(BLOCK_LEN) * BLOCK_LEN))
}

/// Size in bytes of the data unit described by `header`, unpadded.
fn data_size(path: &Path, header: &Header) -> Result<usize> {
    let bitpix = header
        .get_i64("BITPIX")
        .ok_or_else(|| fits_err(path, "missing BITPIX"))?;
    let naxis = header.get_i64("NAXIS").unwrap_or(0);
    if naxis == 0 {
        return Ok(0);
    }

    let mut elements: usize = 1;
    for n in 1..=naxis {
        let len = header
            .get_i64(&format!("NAXIS{}", n))
            .ok_or_else(|| fits_err(path, &format!("missing NAXIS{}", n)))?;
        let len = usize::try_from(len).map_err(|_| fits_err(path, "negative axis length"))?;
        elements = elements.checked_mul(len).ok_or_else(|| overflow(path))?;
    }

    let as_usize = |v: i64| usize::try_from(v).map_err(|_| overflow(path));
    let pcount = as_usize(header.get_i64("PCOUNT").unwrap_or(0).max(0))?;
    let gcount = as_usize(header.get_i64("GCOUNT").unwrap_or(1).max(1))?;
    let bytes_per = usize::try_from(bitpix.unsigned_abs() / 8).map_err(|_| overflow(path))?;

    elements
        .checked_add(pcount)
        .and_then(|n| n.checked_mul(gcount))
        .and_then(|n| n.checked_mul(bytes_per))
        .ok_or_else(|| overflow(path))
}

fn required_usize(hdu: &Hdu, key: &str) -> Result<usize> {
    hdu.header
        .get_i64(key)
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| fits_err(&hdu.path, &format!("missing or invalid {}", key)))
}

/// Split a TFORM value such as `1J` or `E` into (repeat, type code).
fn parse_tform(form: &str) -> Option<(usize, char)> {
    let form = form.trim();
    let digits: String = form.chars().take_while(|c| c.is_ascii_digit()).collect();
    let code = form[digits.len()..].chars().next()?.to_ascii_uppercase();
    let repeat = if digits.is_empty() { 1 } else { digits.parse().ok()? };

    if "LXBIJKAEDCMPQ".contains(code) {
        Some((repeat, code))
    } else {
        None
    }
}

/// Bytes occupied by a field of `repeat` elements of type `code`;
/// `None` on overflow.
fn field_width(code: char, repeat: usize) -> Option<usize> {
    let bytes = match code {
        'X' => return Some(repeat.div_ceil(8)),
        'L' | 'B' | 'A' => 1,
        'I' => 2,
        'J' | 'E' => 4,
        'K' | 'D' | 'C' | 'P' => 8,
        'M' | 'Q' => 16,
        _ => 0,
    };
    repeat.checked_mul(bytes)
}

fn decode(code: char, raw: &[u8]) -> Option<f64> {
    let value = match code {
        'B' => f64::from(raw[0]),
        'I' => f64::from(i16::from_be_bytes(raw.try_into().ok()?)),
        'J' => f64::from(i32::from_be_bytes(raw.try_into().ok()?)),
        'K' => i64::from_be_bytes(raw.try_into().ok()?) as f64,
        'E' => f64::from(f32::from_be_bytes(raw.try_into().ok()?)),
        'D' => f64::from_be_bytes(raw.try_into().ok()?),
        _ => return None,
    };
    Some(value)
}
