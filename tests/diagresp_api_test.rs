//! Integration tests for diagonal response synthesis against lookup tables
//! on disk.

use ciao_contrib::diagresp::{mkdiagresp, DiagRespRequest, RefSpec};
use ciao_contrib::fits::{write_fits, Column, FitsFile, TableHdu};
use ciao_contrib::grid::FitsEbounds;
use ciao_contrib::response::{write_arf, write_rmf};
use ciao_contrib::CiaoError;
use tempfile::TempDir;

fn lut_block(name: &str, first_channel: i32, unit: &str, edges: &[f64]) -> TableHdu {
    let n = edges.len() - 1;
    let mut hdu = TableHdu::new(name);
    hdu.header.set("EUNIT", unit);
    hdu.push_column(Column::int32(
        "CHANNEL",
        None,
        (0..n as i32).map(|i| first_channel + i).collect(),
    ));
    hdu.push_column(Column::float64("E_MIN", Some(unit), edges[..n].to_vec()));
    hdu.push_column(Column::float64("E_MAX", Some(unit), edges[1..].to_vec()));
    hdu
}

fn lookup_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    let source = FitsEbounds::new(temp.path());
    write_fits(
        &source.table_path("xmm"),
        &[
            lut_block("EPIC-PN_PI", 0, "eV", &[0.0, 5.0, 10.0, 15.0]),
            lut_block("EPIC-MOS_PI", 0, "eV", &[0.0, 15.0, 30.0]),
        ],
        false,
    )
    .unwrap();
    write_fits(
        &source.table_path("asca"),
        &[lut_block("SIS0-CCD1_512chan_PHA", 1, "keV", &[0.5, 1.0, 2.0])],
        false,
    )
    .unwrap();
    temp
}

#[test]
fn instrument_alias_selects_detector_block() {
    let dir = lookup_dir();
    let request = DiagRespRequest {
        telescope: "xmm".to_string(),
        instrument: Some("EMOS1".to_string()),
        ..Default::default()
    };

    let resp = mkdiagresp(&request, &FitsEbounds::new(dir.path())).unwrap();

    assert_eq!(resp.key.telescope, "XMM");
    assert_eq!(resp.key.instrument.as_deref(), Some("EPIC"));
    assert_eq!(resp.key.detector.as_deref(), Some("MOS"));
    assert_eq!(resp.block.as_deref(), Some("EPIC-MOS_PI"));
    assert_eq!(resp.grid.len(), 2);
    assert_eq!(resp.grid.upper()[1], 0.03);
    // The zero lower edge is raised to the threshold.
    assert_eq!(resp.arf.energ_lo()[0], 1e-12);
    assert_eq!(resp.rmf.e_min()[0], 0.0);
}

#[test]
fn sub_binned_block_is_found() {
    let dir = lookup_dir();
    let request = DiagRespRequest {
        telescope: "ASCA".to_string(),
        instrument: Some("sis0".to_string()),
        detector: Some("ccd1".to_string()),
        chantype: Some("pha".to_string()),
        nchan: Some(512),
        ..Default::default()
    };

    let resp = mkdiagresp(&request, &FitsEbounds::new(dir.path())).unwrap();

    assert_eq!(resp.block.as_deref(), Some("SIS0-CCD1_512chan_PHA"));
    assert_eq!(resp.rmf.offset(), 1);
    assert_eq!(resp.rmf.f_chan(), vec![1, 2]);
}

#[test]
fn missing_table_and_block_are_configuration_errors() {
    let dir = lookup_dir();
    let source = FitsEbounds::new(dir.path());

    let nustar = DiagRespRequest {
        telescope: "NuSTAR".to_string(),
        ..Default::default()
    };
    let err = mkdiagresp(&nustar, &source).unwrap_err();
    assert!(matches!(err, CiaoError::Configuration { .. }));
    assert!(err.to_string().contains("no corresponding lookup table"));

    let asca = DiagRespRequest {
        telescope: "ASCA".to_string(),
        instrument: Some("GIS".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        mkdiagresp(&asca, &source).unwrap_err(),
        CiaoError::Configuration { .. }
    ));
}

#[test]
fn refspec_file_drives_request_and_files_are_written() {
    let dir = lookup_dir();

    let mut spectrum = TableHdu::new("SPECTRUM");
    spectrum.header.set("TELESCOP", "XMM");
    spectrum.header.set("INSTRUME", "EPN");
    spectrum.header.set("CHANTYPE", "PI");
    spectrum.header.set("FILTER", "Medium");
    spectrum.push_column(Column::int32("CHANNEL", None, vec![0, 1, 2]));
    spectrum.push_column(Column::int32("COUNTS", None, vec![1, 0, 3]));
    let refspec = dir.path().join("pn.pha");
    write_fits(&refspec, &[spectrum], false).unwrap();

    let request = DiagRespRequest {
        refspec: Some(RefSpec::Path(refspec)),
        ..Default::default()
    };
    let resp = mkdiagresp(&request, &FitsEbounds::new(dir.path())).unwrap();
    assert_eq!(resp.block.as_deref(), Some("EPIC-PN_PI"));
    // Filters do not select XMM grids.
    assert_eq!(resp.key.filter, None);

    let rmf_path = dir.path().join("pn.rmf");
    let arf_path = dir.path().join("pn.arf");
    write_rmf(&rmf_path, &resp.rmf, &resp.key, false).unwrap();
    write_arf(&arf_path, &resp.arf, &resp.key, false).unwrap();

    let rmf = FitsFile::open(&rmf_path).unwrap();
    let matrix = rmf.find("MATRIX").unwrap();
    assert_eq!(matrix.header.get_str("TELESCOP"), Some("XMM"));
    assert_eq!(matrix.header.get_str("DETNAM"), Some("PN"));
    assert_eq!(matrix.header.get_str("CHANTYPE"), Some("PI"));
    assert_eq!(matrix.header.get_i64("DETCHANS"), Some(3));
    assert_eq!(matrix.header.get_i64("TLMIN4"), Some(0));

    let ebounds = rmf.find("EBOUNDS").unwrap().table().unwrap();
    assert_eq!(ebounds.column_i64("CHANNEL").unwrap(), vec![0, 1, 2]);

    let arf = FitsFile::open(&arf_path).unwrap();
    let specresp = arf.find("SPECRESP").unwrap().table().unwrap();
    assert_eq!(specresp.column_f64("SPECRESP").unwrap(), vec![1.0, 1.0, 1.0]);
}
