//! OGIP response files.

use std::path::Path;

use crate::error::Result;
use crate::fits::{write_fits, Column, Header, TableHdu};
use crate::instruments::InstrumentKey;

use super::{DiagonalRmf, FlatArf};

const DEFAULT_CHANTYPE: &str = "PI";

/// Write `arf` as a SPECRESP extension.
pub fn write_arf(path: &Path, arf: &FlatArf, key: &InstrumentKey, clobber: bool) -> Result<()> {
    let mut hdu = TableHdu::new("SPECRESP");
    hdu.header = mission_header(key);
    hdu.header.set("HDUCLASS", "OGIP");
    hdu.header.set("HDUCLAS1", "RESPONSE");
    hdu.header.set("HDUCLAS2", "SPECRESP");
    hdu.header.set("HDUVERS", "1.1.0");

    hdu.push_column(Column::float32("ENERG_LO", Some("keV"), to_f32(arf.energ_lo())));
    hdu.push_column(Column::float32("ENERG_HI", Some("keV"), to_f32(arf.energ_hi())));
    hdu.push_column(Column::float32("SPECRESP", Some("cm**2"), to_f32(arf.specresp())));

    write_fits(path, &[hdu], clobber)
}

/// Write `rmf` as MATRIX and EBOUNDS extensions.
pub fn write_rmf(path: &Path, rmf: &DiagonalRmf, key: &InstrumentKey, clobber: bool) -> Result<()> {
    let chantype = key.channel_type.as_deref().unwrap_or(DEFAULT_CHANTYPE);
    let detchans = rmf.detchans() as i64;
    let last_channel = rmf.offset() + detchans - 1;

    let mut matrix = TableHdu::new("MATRIX");
    matrix.header = mission_header(key);
    matrix.header.set("HDUCLASS", "OGIP");
    matrix.header.set("HDUCLAS1", "RESPONSE");
    matrix.header.set("HDUCLAS2", "RSP_MATRIX");
    matrix.header.set("HDUCLAS3", "REDIST");
    matrix.header.set("HDUVERS", "1.3.0");
    matrix.header.set("CHANTYPE", chantype);
    matrix.header.set("DETCHANS", detchans);
    matrix.header.set("TLMIN4", rmf.offset());
    matrix.header.set("TLMAX4", last_channel);
    matrix.header.set("LO_THRES", 0.0);

    matrix.push_column(Column::float32("ENERG_LO", Some("keV"), to_f32(rmf.energ_lo())));
    matrix.push_column(Column::float32("ENERG_HI", Some("keV"), to_f32(rmf.energ_hi())));
    matrix.push_column(Column::int16("N_GRP", None, rmf.n_grp().iter().map(|&n| n as i16).collect()));
    matrix.push_column(Column::int32("F_CHAN", None, to_i32(&rmf.f_chan())));
    matrix.push_column(Column::int32("N_CHAN", None, to_i32(&rmf.n_chan())));
    matrix.push_column(Column::float32("MATRIX", None, to_f32(&rmf.matrix())));

    let mut ebounds = TableHdu::new("EBOUNDS");
    ebounds.header = mission_header(key);
    ebounds.header.set("HDUCLASS", "OGIP");
    ebounds.header.set("HDUCLAS1", "RESPONSE");
    ebounds.header.set("HDUCLAS2", "EBOUNDS");
    ebounds.header.set("HDUVERS", "1.2.0");
    ebounds.header.set("CHANTYPE", chantype);
    ebounds.header.set("DETCHANS", detchans);
    ebounds.header.set("TLMIN1", rmf.offset());
    ebounds.header.set("TLMAX1", last_channel);

    let channels: Vec<i32> = (rmf.offset()..=last_channel).map(|c| c as i32).collect();
    ebounds.push_column(Column::int32("CHANNEL", None, channels));
    ebounds.push_column(Column::float32("E_MIN", Some("keV"), to_f32(rmf.e_min())));
    ebounds.push_column(Column::float32("E_MAX", Some("keV"), to_f32(rmf.e_max())));

    write_fits(path, &[matrix, ebounds], clobber)
}

fn mission_header(key: &InstrumentKey) -> Header {
    let mut header = Header::new();
    header.set("TELESCOP", key.telescope.as_str());
    header.set("INSTRUME", key.instrument.as_deref().unwrap_or("NONE"));
    if let Some(det) = &key.detector {
        header.set("DETNAM", det.as_str());
    }
    if let Some(filter) = &key.filter {
        header.set("FILTER", filter.as_str());
    }
    header
}

fn to_f32(values: &[f64]) -> Vec<f32> {
    values.iter().map(|&v| v as f32).collect()
}

fn to_i32(values: &[i64]) -> Vec<i32> {
    values.iter().map(|&v| v as i32).collect()
}
