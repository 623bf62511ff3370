//! Kernel-level properties from the documented formulas

use filter_tests::cmyka_buffer;
use oxdisplay_core::kernels::colorblind::Deficiency;
use oxdisplay_core::kernels::{contrast, gamma};
use oxdisplay_core::{
    Filter, FilterKind, FilterParams, ParamField, ParamValue, PixelFormat, PixelRegion, Region,
};

fn apply_filter(filter: &mut Filter, data: &mut [f32], format: PixelFormat, region: Region) {
    let mut view = PixelRegion::interleaved(data, format, region).unwrap();
    filter.apply(&mut view).unwrap();
}

fn apply_rgba(filter: &mut Filter, data: &mut [f32], width: u32, height: u32) {
    apply_filter(
        filter,
        data,
        PixelFormat::RgbaF32,
        Region::new(0, 0, width, height),
    );
}

#[test]
fn gamma_table_obeys_its_law() {
    for g in [0.25, 0.5, 1.0, 1.8, 2.2, 4.0] {
        let table = gamma::gamma_table(g);
        for i in 0..=255usize {
            let expected = (255.0 * (i as f64 / 255.0).powf(1.0 / g)).round() as u8;
            assert_eq!(table[i], expected, "gamma {g} at {i}");
        }
        assert_eq!(table[0], 0);
        assert_eq!(table[255], 255);
    }
}

#[test]
fn non_positive_gamma_behaves_as_identity() {
    for g in [0.0, -1.0, -100.0] {
        let table = gamma::gamma_table(g);
        for (i, &entry) in table.iter().enumerate() {
            assert_eq!(entry as usize, i);
        }
    }
}

#[test]
fn contrast_table_obeys_its_law() {
    for c in [0.5, 1.0, 2.0, 5.0] {
        let table = contrast::contrast_table(c);
        for i in 0..=255usize {
            let phase = c * 2.0 * std::f64::consts::PI * i as f64 / 255.0;
            let expected = (255.0 * 0.5 * (1.0 + phase.sin())).round() as u8;
            assert_eq!(table[i], expected, "contrast {c} at {i}");
        }
    }
}

#[test]
fn colorblind_white_anchor_is_a_fixed_point() {
    for deficiency in [
        Deficiency::Protanopia,
        Deficiency::Deuteranopia,
        Deficiency::Tritanopia,
    ] {
        let mut filter = Filter::new(FilterKind::Colorblind);
        filter
            .set_param(ParamField::Deficiency, ParamValue::Deficiency(deficiency))
            .unwrap();

        let mut data = vec![1.0f32, 1.0, 1.0, 1.0];
        apply_rgba(&mut filter, &mut data, 1, 1);
        for channel in &data[..3] {
            assert!(
                (channel - 1.0).abs() < 1e-4,
                "{deficiency:?} moved white to {data:?}"
            );
        }
        assert_eq!(data[3], 1.0);
    }
}

#[test]
fn colorblind_reduces_red_green_separation() {
    let mut filter = Filter::new(FilterKind::Colorblind);
    filter
        .set_param(
            ParamField::Deficiency,
            ParamValue::Deficiency(Deficiency::Deuteranopia),
        )
        .unwrap();

    let mut data = vec![
        1.0, 0.0, 0.0, 1.0, // red
        0.0, 1.0, 0.0, 1.0, // green
    ];
    apply_rgba(&mut filter, &mut data, 2, 1);

    let distance = (data[0] - data[4]).abs() + (data[1] - data[5]).abs();
    // Originally 2.0 apart on those channels; simulation must collapse them
    assert!(distance < 1.0, "red/green still {distance} apart");
}

#[test]
fn clip_warning_ignores_in_range_pixels_at_any_position() {
    let mut filter = Filter::new(FilterKind::ClipWarning);
    let width = 32u32;
    let height = 16u32;
    let mut data = Vec::new();
    for i in 0..(width * height) as usize {
        let t = (i % 255) as f32 / 255.0;
        data.extend_from_slice(&[t, 1.0 - t, 0.5, 1.0]);
    }
    let original = data.clone();

    // An offset region exercises the absolute-coordinate path
    apply_filter(
        &mut filter,
        &mut data,
        PixelFormat::RgbaF32,
        Region::new(123, 77, width, height),
    );
    assert_eq!(data, original);
}

#[test]
fn clip_warning_flags_nan_as_bogus_over_other_classes() {
    let mut filter = Filter::new(FilterKind::ClipWarning);
    let mut data = vec![f32::NAN, -5.0, 9.0, 1.0];
    apply_rgba(&mut filter, &mut data, 1, 1);
    assert_eq!(data, vec![1.0, 1.0, 0.25, 1.0]);
}

#[test]
fn clip_warning_alternates_on_the_eight_pixel_diagonal() {
    let mut filter = Filter::new(FilterKind::ClipWarning);
    let width = 16u32;
    let mut data = Vec::new();
    for _ in 0..width {
        data.extend_from_slice(&[1.5f32, 0.0, 0.0, 1.0]);
    }
    apply_rgba(&mut filter, &mut data, width, 1);

    let first = &data[..4];
    let eighth = &data[8 * 4..8 * 4 + 4];
    assert_ne!(first, eighth, "variant did not alternate at x = 8");
    for x in 0..8usize {
        assert_eq!(&data[x * 4..x * 4 + 4], first, "x = {x}");
    }
    for x in 8..16usize {
        assert_eq!(&data[x * 4..x * 4 + 4], eighth, "x = {x}");
    }
}

#[test]
fn ink_coverage_respects_the_limit() {
    let mut filter = Filter::new(FilterKind::InkCoverage);
    let region = Region::new(0, 0, 2, 1);

    // 200% total coverage, default limit 240%: untouched
    let mut under = cmyka_buffer(2, 1, [0.5, 0.5, 0.5, 0.5], 1.0);
    let original = under.clone();
    apply_filter(&mut filter, &mut under, PixelFormat::CmykaF32, region);
    assert_eq!(under, original);

    // 280% exceeds the limit: replaced with the warning tuple
    let mut over = cmyka_buffer(2, 1, [0.7, 0.7, 0.7, 0.7], 1.0);
    apply_filter(&mut filter, &mut over, PixelFormat::CmykaF32, region);
    assert_ne!(&over[..5], &[0.7, 0.7, 0.7, 0.7, 1.0]);
    // Both pixels get the same replacement
    assert_eq!(over[..5], over[5..]);
}

#[test]
fn ink_coverage_skips_transparent_pixels() {
    let mut filter = Filter::new(FilterKind::InkCoverage);
    let mut data = cmyka_buffer(1, 1, [1.0, 1.0, 1.0, 1.0], 0.0);
    let original = data.clone();
    apply_filter(
        &mut filter,
        &mut data,
        PixelFormat::CmykaF32,
        Region::new(0, 0, 1, 1),
    );
    assert_eq!(data, original);
}

#[test]
fn ink_coverage_limit_is_configurable() {
    let mut filter = Filter::new(FilterKind::InkCoverage);
    filter
        .set_param(ParamField::InkLimit, ParamValue::Float(150.0))
        .unwrap();

    // 200% now exceeds the 150% limit
    let mut data = cmyka_buffer(1, 1, [0.5, 0.5, 0.5, 0.5], 1.0);
    let original = data.clone();
    apply_filter(
        &mut filter,
        &mut data,
        PixelFormat::CmykaF32,
        Region::new(0, 0, 1, 1),
    );
    assert_ne!(data, original);
}

#[test]
fn aces_exposure_shifts_the_curve_input() {
    let mut neutral = Filter::new(FilterKind::Aces);
    let mut data = vec![0.5f32, 0.5, 0.5, 1.0];
    apply_rgba(&mut neutral, &mut data, 1, 1);
    let at_half = data[0];

    let mut pushed = Filter::new(FilterKind::Aces);
    pushed
        .set_param(ParamField::Exposure, ParamValue::Float(1.0))
        .unwrap();
    let mut data = vec![0.25f32, 0.25, 0.25, 1.0];
    apply_rgba(&mut pushed, &mut data, 1, 1);

    // One stop up on half the input lands on the same curve point
    assert!((data[0] - at_half).abs() < 1e-6);
}

#[test]
fn aces_alpha_is_untouched() {
    let mut filter = Filter::new(FilterKind::Aces);
    let mut data = vec![2.0f32, 0.1, 0.7, 0.42];
    apply_rgba(&mut filter, &mut data, 1, 1);
    assert_eq!(data[3], 0.42);
    assert!(data[0] <= 1.15, "RRT fit did not compress the highlight");
}

#[test]
fn icc_filter_without_profiles_is_identity() {
    let mut filter = Filter::new(FilterKind::Icc);
    let mut data = vec![0.3f32, 0.6, 0.9, 1.0];
    let original = data.clone();
    apply_rgba(&mut filter, &mut data, 1, 1);
    assert_eq!(data, original);
}

#[test]
fn icc_filter_with_unreadable_profile_is_identity() {
    let mut filter = Filter::new(FilterKind::Icc);
    filter
        .set_param(
            ParamField::DestProfile,
            ParamValue::Path(Some("/nonexistent/monitor.icc".into())),
        )
        .unwrap();
    assert!(filter.is_enabled());

    let mut data = vec![0.3f32, 0.6, 0.9, 1.0];
    let original = data.clone();
    apply_rgba(&mut filter, &mut data, 1, 1);
    assert_eq!(data, original);
}

#[test]
fn proof_filter_without_profile_is_identity() {
    let mut filter = Filter::new(FilterKind::Proof);
    let mut data = vec![0.2f32, 0.4, 0.8, 1.0];
    let original = data.clone();
    apply_rgba(&mut filter, &mut data, 1, 1);
    assert_eq!(data, original);
}

#[test]
fn parameter_edits_apply_on_next_use_only() {
    // Burst of edits before any apply; the one recomputation uses the last
    // value written
    let mut filter = Filter::new(FilterKind::Gamma);
    filter
        .set_param(ParamField::Gamma, ParamValue::Float(1.4))
        .unwrap();
    filter
        .set_param(ParamField::Gamma, ParamValue::Float(2.0))
        .unwrap();

    let mut data = vec![0.5f32, 0.5, 0.5, 1.0];
    apply_rgba(&mut filter, &mut data, 1, 1);

    let table = gamma::gamma_table(2.0);
    let expected = table[128] as f32 / 255.0;
    assert!((data[0] - expected).abs() < 1e-6);
    match filter.params() {
        FilterParams::Gamma(p) => assert_eq!(p.gamma, 2.0),
        other => panic!("unexpected params: {other:?}"),
    }
}
