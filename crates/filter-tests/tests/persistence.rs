//! Persisted filter state: parameters only, tolerant loading

use oxdisplay_core::kernels::colorblind::Deficiency;
use oxdisplay_core::{
    Filter, FilterChain, FilterKind, FilterParams, ParamField, ParamValue, RenderingIntent,
};
use serde_json::json;

#[test]
fn default_params_round_trip_for_every_kind() {
    for kind in FilterKind::ALL {
        let filter = Filter::new(kind);
        let state = filter.to_state().unwrap();
        let restored = Filter::from_state(&state).unwrap();
        assert_eq!(restored.params(), filter.params(), "{kind:?}");
        assert_eq!(restored.kind(), kind);
        assert!(restored.is_enabled());
    }
}

#[test]
fn edited_params_round_trip_field_for_field() {
    let mut gamma = Filter::new(FilterKind::Gamma);
    gamma
        .set_param(ParamField::Gamma, ParamValue::Float(2.4))
        .unwrap();

    let mut colorblind = Filter::new(FilterKind::Colorblind);
    colorblind
        .set_param(
            ParamField::Deficiency,
            ParamValue::Deficiency(Deficiency::Tritanopia),
        )
        .unwrap();

    let mut icc = Filter::new(FilterKind::Icc);
    icc.set_param(
        ParamField::DestProfile,
        ParamValue::Path(Some("/usr/share/color/icc/monitor.icc".into())),
    )
    .unwrap();
    icc.set_param(
        ParamField::Intent,
        ParamValue::Intent(RenderingIntent::AbsoluteColorimetric),
    )
    .unwrap();
    icc.set_param(ParamField::BlackPointCompensation, ParamValue::Bool(true))
        .unwrap();

    let mut proof = Filter::new(FilterKind::Proof);
    proof
        .set_param(ParamField::GamutCheck, ParamValue::Bool(true))
        .unwrap();
    proof
        .set_param(ParamField::AlarmColor, ParamValue::Color([1.0, 0.0, 1.0]))
        .unwrap();

    for filter in [gamma, colorblind, icc, proof] {
        let state = filter.to_state().unwrap();
        let restored = Filter::from_state(&state).unwrap();
        assert_eq!(restored.params(), filter.params());
    }
}

#[test]
fn profile_paths_persist_as_strings() {
    let mut filter = Filter::new(FilterKind::Icc);
    filter
        .set_param(
            ParamField::DestProfile,
            ParamValue::Path(Some("/path/to/monitor.icc".into())),
        )
        .unwrap();

    let state = filter.to_state().unwrap();
    assert_eq!(
        state.get("dest-profile").and_then(|v| v.as_str()),
        Some("/path/to/monitor.icc")
    );
}

#[test]
fn enums_persist_as_symbolic_names() {
    let mut filter = Filter::new(FilterKind::Colorblind);
    filter
        .set_param(
            ParamField::Deficiency,
            ParamValue::Deficiency(Deficiency::Deuteranopia),
        )
        .unwrap();
    let state = filter.to_state().unwrap();
    assert_eq!(
        state.get("type").and_then(|v| v.as_str()),
        Some("deuteranopia")
    );
    assert_eq!(
        state.get("filter").and_then(|v| v.as_str()),
        Some("colorblind")
    );
}

#[test]
fn unknown_keys_are_ignored() {
    let state = json!({
        "filter": "aces",
        "exposure": 0.75,
        "vignette": true,
        "lut-cube": "/tmp/some.cube",
    });
    let filter = Filter::from_state(&state).unwrap();
    match filter.params() {
        FilterParams::Aces(p) => assert_eq!(p.exposure, 0.75),
        other => panic!("unexpected params: {other:?}"),
    }
}

#[test]
fn missing_keys_fall_back_to_kernel_defaults() {
    let state = json!({ "filter": "ink-coverage" });
    let filter = Filter::from_state(&state).unwrap();
    assert_eq!(filter.params(), &FilterKind::InkCoverage.default_params());
}

#[test]
fn out_of_range_values_reset_to_defaults_on_load() {
    let state = json!({
        "filter": "ink-coverage",
        "ink-limit": -50.0,
    });
    let filter = Filter::from_state(&state).unwrap();
    match filter.params() {
        FilterParams::InkCoverage(p) => assert_eq!(p.limit, 240.0),
        other => panic!("unexpected params: {other:?}"),
    }

    let state = json!({
        "filter": "proof",
        "gamut-threshold": 99.0,
        "gamut-check": true,
    });
    let filter = Filter::from_state(&state).unwrap();
    match filter.params() {
        FilterParams::Proof(p) => {
            // The invalid field resets; the valid one survives
            assert_eq!(p.gamut_threshold, 0.05);
            assert!(p.gamut_check);
        }
        other => panic!("unexpected params: {other:?}"),
    }
}

#[test]
fn chain_round_trip_preserves_order_and_enabled_flags() {
    let mut chain = FilterChain::new();
    let gamma = chain.add(Filter::new(FilterKind::Gamma));
    let aces = chain.add(Filter::new(FilterKind::Aces));
    chain.add(Filter::new(FilterKind::ClipWarning));
    chain
        .get_mut(gamma)
        .unwrap()
        .set_param(ParamField::Gamma, ParamValue::Float(1.6))
        .unwrap();
    chain.get_mut(aces).unwrap().set_enabled(false);

    let state = chain.to_state().unwrap();
    let restored = FilterChain::from_state(&state);

    let kinds: Vec<FilterKind> = restored.iter().map(|f| f.kind()).collect();
    assert_eq!(
        kinds,
        vec![FilterKind::Gamma, FilterKind::Aces, FilterKind::ClipWarning]
    );
    let enabled: Vec<bool> = restored.iter().map(|f| f.is_enabled()).collect();
    assert_eq!(enabled, vec![true, false, true]);

    for (a, b) in chain.iter().zip(restored.iter()) {
        assert_eq!(a.params(), b.params());
    }
}

#[test]
fn unknown_filter_tags_are_skipped_not_fatal() {
    let state = json!([
        { "filter": "gamma", "gamma": 2.0 },
        { "filter": "bloom", "radius": 12 },
        { "filter": "colorblind", "type": "protanopia" },
    ]);
    let chain = FilterChain::from_state(&state);
    assert_eq!(chain.len(), 2);
}

#[test]
fn derived_state_is_never_persisted() {
    let mut filter = Filter::new(FilterKind::Gamma);
    filter
        .set_param(ParamField::Gamma, ParamValue::Float(2.2))
        .unwrap();
    filter.ensure_ready();

    let state = filter.to_state().unwrap();
    let keys: Vec<&String> = state.as_object().unwrap().keys().collect();
    // Exactly the tag, the enabled flag and the parameter fields
    assert_eq!(keys.len(), 3);
    assert!(state.get("filter").is_some());
    assert!(state.get("enabled").is_some());
    assert!(state.get("gamma").is_some());
}
