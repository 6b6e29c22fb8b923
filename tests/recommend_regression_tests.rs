//! Recommendation Regression Tests
//!
//! Runs the example presets through a frozen 3-tree forest and its scalers
//! (tests/fixtures/) and pins the resulting labels and reports.

use approx::assert_relative_eq;
use crop_recommender::features::PRESETS;
use crop_recommender::{ModelContext, ModelPaths, NormalizationStage, CROPS, FEATURES, UNKNOWN_CROP};
use std::path::PathBuf;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn paths_with_secondary(secondary: Option<&str>) -> ModelPaths {
    let dir = fixtures();
    ModelPaths {
        classifier: dir.join("model.json"),
        primary_scaler: dir.join("minmaxscaler.json"),
        secondary_scaler: secondary.map(|name| dir.join(name)),
    }
}

fn load(secondary: Option<&str>) -> ModelContext {
    ModelContext::load(&paths_with_secondary(secondary)).expect("fixture artifacts load")
}

// Expected labels for the three presets: rice, maize, banana
const EXPECTED: [(i64, &str); 3] = [(1, "🌾 Rice"), (2, "🌽 Maize"), (13, "🍌 Banana")];

#[test]
fn presets_map_to_fixed_labels() {
    let ctx = load(None);
    for (preset, (label, name)) in PRESETS.iter().zip(EXPECTED) {
        let rec = ctx.recommend(&preset.features).unwrap();
        assert_eq!(rec.label, label, "preset {}", preset.name);
        assert_eq!(rec.crop_name(), name);
    }
}

#[test]
fn preset_confidences_are_stable() {
    let ctx = load(None);
    let rice = ctx.recommend(&PRESETS[0].features).unwrap();
    assert_relative_eq!(rice.confidence, (28.0 / 30.0 + 1.0 + 40.0 / 105.0) / 3.0, epsilon = 1e-9);

    let banana = ctx.recommend(&PRESETS[2].features).unwrap();
    assert_relative_eq!(banana.confidence, (2.0 + 30.0 / 105.0) / 3.0, epsilon = 1e-9);
}

#[test]
fn preset_report_is_fixed() {
    let ctx = load(None);
    let report = ctx.recommend_report(&PRESETS[0].features.to_row());
    let expected = "\
# 🎯 Recommendation

## Ideal crop: 🌾 Rice

### 📊 Your parameters:
- **Nitrogen (N)**: 90
- **Phosphorus (P)**: 42
- **Potassium (K)**: 43
- **Temperature**: 20.8°C
- **Humidity**: 82%
- **pH**: 6.5
- **Rainfall**: 203 mm

### ✅ This crop is well suited to your soil!
";
    assert_eq!(report, expected);
}

#[test]
fn forest_saved_as_secondary_scaler_is_ignored() {
    let without = load(None);
    let with = load(Some("standscaler.json"));
    assert!(matches!(with.stage(), NormalizationStage::Single(_)));

    for preset in &PRESETS {
        let row = preset.features.to_row();
        assert_eq!(with.recommend_report(&row), without.recommend_report(&row));
    }
}

#[test]
fn unreadable_secondary_scaler_is_treated_as_absent() {
    let ctx = load(Some("does_not_exist.json"));
    assert!(matches!(ctx.stage(), NormalizationStage::Single(_)));
    assert_eq!(ctx.recommend(&PRESETS[1].features).unwrap().label, 2);
}

#[test]
fn real_secondary_scaler_is_chained() {
    let unit = load(Some("standard_unit.json"));
    assert_eq!(unit.stage().describe(), "MinMaxScaler → StandardScaler");
    for (preset, (label, _)) in PRESETS.iter().zip(EXPECTED) {
        assert_eq!(unit.recommend(&preset.features).unwrap().label, label);
    }

    // Shifting scaled N down by 0.5 pushes the rice preset onto the banana branch
    let shifted = load(Some("standard_shift_n.json"));
    assert_eq!(shifted.recommend(&PRESETS[0].features).unwrap().label, 13);
}

#[test]
fn in_range_inputs_name_exactly_one_crop() {
    let ctx = load(None);
    // Corners and midpoints of the slider ranges
    for pick in 0..3 {
        let row: Vec<f64> = FEATURES
            .iter()
            .map(|f| match pick {
                0 => f.min,
                1 => f.max,
                _ => (f.min + f.max) / 2.0,
            })
            .collect();
        let report = ctx.recommend_report(&row);
        let named = CROPS.iter().filter(|c| report.contains(c.name)).count();
        let unknown = report.contains(UNKNOWN_CROP) as usize;
        assert_eq!(named + unknown, 1, "report for {:?}:\n{}", row, report);
    }
}

#[test]
fn wrong_length_rows_yield_error_strings() {
    let ctx = load(None);
    for row in [vec![], vec![1.0; 6], vec![1.0; 8]] {
        let report = ctx.recommend_report(&row);
        assert!(report.starts_with("❌ Prediction failed:"), "{}", report);
    }
    // Context is still usable afterwards
    assert_eq!(ctx.recommend(&PRESETS[0].features).unwrap().label, 1);
}

#[test]
fn missing_primary_scaler_is_fatal() {
    let mut paths = paths_with_secondary(None);
    paths.primary_scaler = fixtures().join("nope.json");
    let err = ModelContext::load(&paths).unwrap_err();
    assert!(err.to_string().contains("Failed to load primary scaler"));
}

#[test]
fn scaler_in_classifier_slot_is_fatal() {
    let mut paths = paths_with_secondary(None);
    paths.classifier = fixtures().join("minmaxscaler.json");
    let err = ModelContext::load(&paths).unwrap_err();
    assert!(format!("{:#}", err).contains("MinMaxScaler is not a classifier"));
}
