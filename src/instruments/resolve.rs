//! Validation and canonicalization of an [`InstrumentKey`].
//!
//! Stages, in order:
//! 1. telescope is required; aliases map to the canonical name
//! 2. instruments unsuitable for spectral fitting are rejected
//! 3. telescopes with a fixed instrument get it, whatever was supplied
//! 4. instrument, detector, filter and channel type are checked against
//!    the telescope's table entry and rewritten to canonical spellings
//! 5. a channel count equal to the instrument's full resolution is dropped
//!
//! Telescopes missing from the table pass through untouched; the grid
//! lookup reports them.

use crate::error::{CiaoError, Result};

use super::key::InstrumentKey;
use super::table::{find_telescope, InstrumentSpec, TelescopeSpec};

/// A canonical key and the table entry it was checked against.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub key: InstrumentKey,
    /// `None` for telescopes outside the table.
    pub spec: Option<&'static TelescopeSpec>,
}

/// Validate `input` and reduce it to the fields that select a grid.
///
/// # Errors
///
/// - `MissingParameter` if the telescope is empty
/// - `UnsuitableInstrument` for instruments unfit for spectral fitting
/// - `InvalidParameter` for values outside the allowed sets
pub fn resolve(input: &InstrumentKey) -> Result<Resolved> {
    let telescope = input.telescope.trim();
    if telescope.is_empty() {
        return Err(CiaoError::MissingParameter {
            message: "'telescope' parameter must be specified!".to_string(),
        });
    }

    let Some(spec) = find_telescope(telescope)? else {
        tracing::debug!("telescope {} is not in the table, passing through", telescope);
        let mut key = input.clone();
        key.telescope = telescope.to_string();
        return Ok(Resolved { key, spec: None });
    };

    let supplied_instrument = non_empty(input.instrument.as_deref());

    if let Some(name) = supplied_instrument {
        if let Some(u) = spec
            .unsuitable
            .iter()
            .find(|u| u.instrument.eq_ignore_ascii_case(name))
        {
            return Err(CiaoError::UnsuitableInstrument {
                message: u.message.clone(),
            });
        }
    }

    let (instrument, forced_detector) = if spec.fixed_instrument {
        let only = &spec.instruments[0];
        if let Some(name) = supplied_instrument.filter(|n| !n.eq_ignore_ascii_case(&only.name)) {
            tracing::debug!("{} always uses {}, ignoring instrument {}", spec.name, only.name, name);
        }
        (only, None)
    } else {
        let name = supplied_instrument.ok_or_else(|| instrument_error(spec))?;
        spec.instruments
            .iter()
            .find_map(|i| i.matches(name).map(|det| (i, det)))
            .ok_or_else(|| instrument_error(spec))?
    };

    let detector = match forced_detector {
        Some(det) => Some(det.to_string()),
        None => resolve_detector(spec, instrument, non_empty(input.detector.as_deref()))?,
    };
    let filter = resolve_filter(spec, instrument, non_empty(input.filter.as_deref()))?;
    let channel_type = resolve_chantype(spec, instrument, non_empty(input.channel_type.as_deref()))?;
    let channel_count = resolve_channel_count(instrument, input.channel_count)?;

    Ok(Resolved {
        key: InstrumentKey {
            telescope: spec.name.clone(),
            instrument: Some(instrument.name.clone()),
            detector,
            filter,
            channel_count,
            channel_type,
        },
        spec: Some(spec),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn instrument_error(spec: &TelescopeSpec) -> CiaoError {
    CiaoError::invalid(format!(
        "'telescope={}' requires 'instrument' argument to be {}",
        spec.label(),
        spec.instrument_names()
    ))
}

/// `'telescope=X' with 'instrument=Y'`, or just the telescope part for
/// telescopes with a fixed instrument.
fn context(spec: &TelescopeSpec, instruments: &str) -> String {
    if spec.fixed_instrument {
        format!("'telescope={}'", spec.label())
    } else {
        format!("'telescope={}' with 'instrument={}'", spec.label(), instruments)
    }
}

fn resolve_detector(
    spec: &TelescopeSpec,
    instrument: &InstrumentSpec,
    supplied: Option<&str>,
) -> Result<Option<String>> {
    let Some(rule) = &instrument.detector else {
        return Ok(None);
    };

    let collapsed = supplied.map(|d| {
        rule.prefixes
            .iter()
            .find(|p| d.to_ascii_uppercase().starts_with(&p.to_ascii_uppercase()))
            .map(String::as_str)
            .unwrap_or(d)
    });

    if let Some(allowed) =
        collapsed.and_then(|d| rule.allowed.iter().find(|a| a.eq_ignore_ascii_case(d)))
    {
        return Ok(Some(allowed.clone()));
    }

    let sharing: Vec<&str> = spec
        .instruments
        .iter()
        .filter(|i| i.detector.as_ref() == Some(rule))
        .map(|i| i.name.as_str())
        .collect();

    Err(CiaoError::invalid(format!(
        "{} requires the 'detector' argument to be {}",
        context(spec, &sharing.join("|")),
        rule.allowed.join("|")
    )))
}

fn resolve_filter(
    spec: &TelescopeSpec,
    instrument: &InstrumentSpec,
    supplied: Option<&str>,
) -> Result<Option<String>> {
    if instrument.filters.is_empty() {
        return Ok(None);
    }

    supplied
        .and_then(|f| instrument.filters.iter().find(|a| a.eq_ignore_ascii_case(f)))
        .map(|f| Some(f.clone()))
        .ok_or_else(|| {
            CiaoError::invalid(format!(
                "{} requires the 'instfilter' argument to be {}",
                context(spec, &instrument.name),
                instrument.filters.join("|")
            ))
        })
}

fn resolve_chantype(
    spec: &TelescopeSpec,
    instrument: &InstrumentSpec,
    supplied: Option<&str>,
) -> Result<Option<String>> {
    if instrument.chantypes.is_empty() {
        return Ok(None);
    }

    let known = supplied.and_then(|c| instrument.chantypes.iter().find(|a| a.eq_ignore_ascii_case(c)));
    match (known, supplied) {
        (Some(canonical), _) => Ok(Some(canonical.clone())),
        (None, Some(other)) if !instrument.strict_chantype => Ok(Some(other.to_string())),
        (None, None) if !instrument.strict_chantype => Ok(None),
        _ => Err(CiaoError::invalid(format!(
            "{} requires the 'chantype' argument to be {}",
            context(spec, &instrument.name),
            instrument.chantypes.join("|")
        ))),
    }
}

fn resolve_channel_count(instrument: &InstrumentSpec, supplied: Option<i64>) -> Result<Option<i64>> {
    match (supplied, instrument.max_channels) {
        (Some(n), _) if n <= 0 => Err(CiaoError::invalid(format!(
            "'nchan' must be a positive integer, not {}",
            n
        ))),
        (Some(n), Some(max)) if n != max => Ok(Some(n)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::table::catalog;

    fn ok(key: InstrumentKey) -> InstrumentKey {
        resolve(&key).unwrap().key
    }

    fn err(key: InstrumentKey) -> String {
        resolve(&key).unwrap_err().to_string()
    }

    #[test]
    fn empty_telescope_is_missing() {
        let e = resolve(&InstrumentKey::new("  ")).unwrap_err();
        assert!(matches!(e, CiaoError::MissingParameter { .. }));
        assert_eq!(e.to_string(), "'telescope' parameter must be specified!");
    }

    #[test]
    fn unknown_telescope_passes_through() {
        let input = InstrumentKey::new("Hubble").with_instrument("COS");
        let resolved = resolve(&input).unwrap();
        assert!(resolved.spec.is_none());
        assert_eq!(resolved.key, input);
    }

    #[test]
    fn xte_is_rxte() {
        let a = ok(InstrumentKey::new("XTE").with_instrument("hexte").with_detector("pwa"));
        let b = ok(InstrumentKey::new("RXTE").with_instrument("HEXTE").with_detector("PWA"));
        assert_eq!(a, b);
        assert_eq!(a.telescope, "RXTE");
    }

    #[test]
    fn telescope_aliases() {
        assert_eq!(ok(InstrumentKey::new("sax").with_instrument("LECS")).telescope, "BeppoSAX");
        assert_eq!(ok(InstrumentKey::new("EROSITA")).telescope, "SRG");
    }

    #[test]
    fn chandra_hrc_is_unsuitable() {
        let e = resolve(&InstrumentKey::new("chandra").with_instrument("hrc")).unwrap_err();
        assert!(e.is_warning());
        assert!(e.to_string().contains("insufficient spectral resolution"));
    }

    #[test]
    fn chandra_acis_requires_known_chantype() {
        let key = ok(InstrumentKey::new("Chandra")
            .with_instrument("acis")
            .with_channel_type("pha_no-cticorr"));
        assert_eq!(key.channel_type.as_deref(), Some("PHA_no-CTIcorr"));

        let e = err(InstrumentKey::new("Chandra").with_instrument("ACIS").with_channel_type("PIB"));
        assert!(e.contains("'chantype' argument to be PI|PHA|PHA_no-CTIcorr"));
    }

    #[test]
    fn fixed_instrument_overrides_input() {
        for (telescope, instrument) in [
            ("COS-B", "COS-B"),
            ("EXOSAT", "CMA"),
            ("HALOSAT", "SDD"),
            ("IXPE", "GPD"),
            ("MAXI", "GSC"),
            ("NICER", "XTI"),
            ("ROSAT", "PSPC"),
            ("SRG", "eROSITA"),
            ("NuSTAR", "FPM"),
        ] {
            let key = ok(InstrumentKey::new(telescope)
                .with_instrument("WRONG")
                .with_detector("DET")
                .with_filter("F")
                .with_channel_type("PI"));
            assert_eq!(key.instrument.as_deref(), Some(instrument), "{}", telescope);
            assert_eq!(key.detector, None);
            assert_eq!(key.filter, None);
            assert_eq!(key.channel_type, None);
        }
    }

    #[test]
    fn asca_sis_requires_ccd() {
        let key = ok(InstrumentKey::new("ASCA").with_instrument("sis1").with_detector("ccd2"));
        assert_eq!(key.instrument.as_deref(), Some("SIS1"));
        assert_eq!(key.detector.as_deref(), Some("CCD2"));

        let e = err(InstrumentKey::new("ASCA").with_instrument("SIS0"));
        assert_eq!(
            e,
            "'telescope=ASCA' with 'instrument=SIS0|SIS1' requires the 'detector' argument to be CCD0|CCD1|CCD2|CCD3"
        );
    }

    #[test]
    fn asca_gis_drops_detector_and_chantype() {
        let key = ok(InstrumentKey::new("ASCA")
            .with_instrument("GIS")
            .with_detector("CCD0")
            .with_channel_type("PI"));
        assert_eq!(key.detector, None);
        assert_eq!(key.channel_type, None);
    }

    #[test]
    fn asca_invalid_instrument_names_allowed_set() {
        let e = err(InstrumentKey::new("ASCA").with_instrument("SIS2"));
        assert_eq!(e, "'telescope=ASCA' requires 'instrument' argument to be GIS|SIS0|SIS1");
    }

    #[test]
    fn bepposax_mecs_requires_detector() {
        let e = err(InstrumentKey::new("SAX").with_instrument("MECS").with_detector("M4"));
        assert!(e.starts_with("'telescope=BeppoSAX|SAX' with 'instrument=MECS'"));
        assert!(e.ends_with("M1|M2|M3"));

        let key = ok(InstrumentKey::new("SAX").with_instrument("PDS").with_detector("M1"));
        assert_eq!(key.detector, None);
    }

    #[test]
    fn calet_detector_prefix_collapses() {
        let key = ok(InstrumentKey::new("CALET")
            .with_detector("HXM1")
            .with_channel_type("gain_hi"));
        assert_eq!(key.instrument.as_deref(), Some("GGBM"));
        assert_eq!(key.detector.as_deref(), Some("HXM"));
        assert_eq!(key.channel_type.as_deref(), Some("GAIN_HI"));

        let e = err(InstrumentKey::new("CALET").with_channel_type("GAIN_HI"));
        assert_eq!(e, "'telescope=CALET' requires the 'detector' argument to be SGM|HXM");

        let e = err(InstrumentKey::new("CALET").with_detector("SGM").with_channel_type("PI"));
        assert!(e.contains("'chantype' argument to be GAIN_HI|GAIN_LO"));
    }

    #[test]
    fn einstein_requires_instrument() {
        let e = err(InstrumentKey::new("Einstein"));
        assert_eq!(e, "'telescope=Einstein' requires 'instrument' argument to be HRI|IPC|SSS|MPC");
        let key = ok(InstrumentKey::new("einstein").with_instrument("ipc").with_detector("X"));
        assert_eq!(key.instrument.as_deref(), Some("IPC"));
        assert_eq!(key.detector, None);
    }

    #[test]
    fn suzaku_xis_variants_collapse() {
        let key = ok(InstrumentKey::new("Suzaku").with_instrument("XIS3").with_detector("X"));
        assert_eq!(key.instrument.as_deref(), Some("XIS"));
        assert_eq!(key.detector, None);

        let e = err(InstrumentKey::new("Suzaku").with_instrument("HXD").with_detector("GSO"));
        assert!(e.ends_with("WELL_GSO|WELL_PIN"));
    }

    #[test]
    fn xmm_epic_aliases_fix_detector() {
        let key = ok(InstrumentKey::new("XMM").with_instrument("EMOS1").with_detector("PN"));
        assert_eq!(key.instrument.as_deref(), Some("EPIC"));
        assert_eq!(key.detector.as_deref(), Some("MOS"));

        let key = ok(InstrumentKey::new("XMM").with_instrument("EPN"));
        assert_eq!(key.detector.as_deref(), Some("PN"));

        let key = ok(InstrumentKey::new("XMM").with_instrument("EPIC").with_detector("mos2"));
        assert_eq!(key.detector.as_deref(), Some("MOS"));
    }

    #[test]
    fn xmm_epic_wrong_detector_fails() {
        let e = err(InstrumentKey::new("XMM").with_instrument("EPIC").with_detector("RGS1"));
        assert_eq!(
            e,
            "'telescope=XMM' with 'instrument=EPIC' requires the 'detector' argument to be PN|MOS"
        );
    }

    #[test]
    fn xmm_rgs_drops_detector() {
        let key = ok(InstrumentKey::new("XMM").with_instrument("RGS").with_detector("RGS1"));
        assert_eq!(key.detector, None);
        assert_eq!(key.channel_type, None);
    }

    #[test]
    fn swift_uvot_requires_filter() {
        let key = ok(InstrumentKey::new("Swift").with_instrument("UVOTA").with_filter("white"));
        assert_eq!(key.instrument.as_deref(), Some("UVOT"));
        assert_eq!(key.filter.as_deref(), Some("WHITE"));

        let e = err(InstrumentKey::new("Swift").with_instrument("UVOT"));
        assert!(e.contains("'instfilter' argument to be B|V|U|UVM2|UVW1|UVW2|WHITE"));
    }

    #[test]
    fn swift_xrt_keeps_chantype_and_drops_filter() {
        let key = ok(InstrumentKey::new("swift")
            .with_instrument("xrt")
            .with_filter("B")
            .with_channel_type("pi"));
        assert_eq!(key.filter, None);
        assert_eq!(key.channel_type.as_deref(), Some("PI"));
    }

    #[test]
    fn xrism_resolve_chantype_is_strict() {
        let key = ok(InstrumentKey::new("XRISM").with_instrument("Resolve").with_channel_type("HI-RES"));
        assert_eq!(key.channel_type.as_deref(), Some("hi-res"));

        let e = err(InstrumentKey::new("XRISM").with_instrument("RESOLVE").with_channel_type("PI"));
        assert!(e.contains("lo-res|mid-res|hi-res"));
    }

    #[test]
    fn channel_count_at_maximum_is_dropped() {
        for (telescope, instrument, detector, max) in [
            ("ASCA", "SIS0", Some("CCD0"), 1024),
            ("ASCA", "GIS", None, 1024),
            ("ROSAT", "PSPC", None, 256),
            ("RXTE", "PCA", None, 256),
            ("BeppoSAX", "PDS", None, 256),
        ] {
            let mut key = InstrumentKey::new(telescope).with_instrument(instrument);
            if let Some(d) = detector {
                key = key.with_detector(d);
            }
            assert_eq!(ok(key.clone().with_channel_count(max)).channel_count, None);
            assert_eq!(ok(key.with_channel_count(max / 4)).channel_count, Some(max / 4));
        }
    }

    #[test]
    fn channel_count_dropped_without_binning_schemes() {
        let key = ok(InstrumentKey::new("NICER").with_channel_count(1501));
        assert_eq!(key.channel_count, None);
    }

    #[test]
    fn non_positive_channel_count_is_invalid() {
        let e = resolve(&InstrumentKey::new("ROSAT").with_channel_count(0)).unwrap_err();
        assert!(matches!(e, CiaoError::InvalidParameter { .. }));
    }

    /// Build an input every table entry must accept.
    fn valid_input(spec: &TelescopeSpec) -> InstrumentKey {
        let instrument = &spec.instruments[0];
        let mut key = InstrumentKey::new(spec.name.as_str()).with_instrument(instrument.name.as_str());
        if let Some(rule) = &instrument.detector {
            key = key.with_detector(rule.allowed[0].as_str());
        }
        if let Some(filter) = instrument.filters.first() {
            key = key.with_filter(filter.as_str());
        }
        if let Some(chantype) = instrument.chantypes.first() {
            key = key.with_channel_type(chantype.as_str());
        }
        key
    }

    #[test]
    fn every_telescope_accepts_a_valid_combination() {
        for spec in catalog().unwrap() {
            let resolved = resolve(&valid_input(spec));
            assert!(resolved.is_ok(), "{}: {:?}", spec.name, resolved.err());
        }
    }

    #[test]
    fn every_detector_rule_rejects_a_wrong_detector() {
        for spec in catalog().unwrap() {
            for instrument in spec.instruments.iter().filter(|i| i.detector.is_some()) {
                let mut key = valid_input(spec).with_instrument(instrument.name.as_str());
                if let Some(chantype) = instrument.chantypes.first() {
                    key = key.with_channel_type(chantype.as_str());
                }
                let e = resolve(&key.with_detector("NOT-A-DETECTOR")).unwrap_err();
                assert!(
                    e.to_string().contains("requires the 'detector' argument"),
                    "{}/{}: {}",
                    spec.name,
                    instrument.name,
                    e
                );
            }
        }
    }

    #[test]
    fn every_multi_instrument_telescope_rejects_unknown_instrument() {
        for spec in catalog().unwrap().iter().filter(|s| !s.fixed_instrument) {
            let e = resolve(&InstrumentKey::new(spec.name.as_str()).with_instrument("NOPE")).unwrap_err();
            assert!(matches!(e, CiaoError::InvalidParameter { .. }), "{}", spec.name);
        }
    }
}
