//! Feature Vector and Input Metadata
//!
//! The seven soil and climate readings fed to the classifier, in the column
//! order the scalers and the forest were fitted on:
//! N, P, K, temperature, humidity, pH, rainfall.
//!
//! Slider ranges, defaults and presets live here so the web layer and the
//! JSON API describe the same inputs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of columns in a feature row
pub const N_FEATURES: usize = 7;

/// Soil and climate readings for one request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Nitrogen (N)
    pub n: f64,
    /// Phosphorus (P)
    pub p: f64,
    /// Potassium (K)
    pub k: f64,
    /// Temperature in °C
    pub temperature: f64,
    /// Relative humidity in %
    pub humidity: f64,
    /// Soil pH
    pub ph: f64,
    /// Rainfall in mm
    pub rainfall: f64,
}

/// Row assembly failure
#[derive(Debug, Error, PartialEq)]
pub enum FeatureError {
    #[error("expected {expected} input values, got {actual}")]
    WrongLength { expected: usize, actual: usize },
}

impl FeatureVector {
    /// Build from a raw row in column order
    pub fn from_slice(values: &[f64]) -> Result<Self, FeatureError> {
        match *values {
            [n, p, k, temperature, humidity, ph, rainfall] => Ok(Self {
                n,
                p,
                k,
                temperature,
                humidity,
                ph,
                rainfall,
            }),
            _ => Err(FeatureError::WrongLength {
                expected: N_FEATURES,
                actual: values.len(),
            }),
        }
    }

    /// Single 7-column row in fitted column order
    pub fn to_row(&self) -> [f64; N_FEATURES] {
        [
            self.n,
            self.p,
            self.k,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }

    /// Value for a feature key
    pub fn get(&self, key: FeatureKey) -> f64 {
        match key {
            FeatureKey::N => self.n,
            FeatureKey::P => self.p,
            FeatureKey::K => self.k,
            FeatureKey::Temperature => self.temperature,
            FeatureKey::Humidity => self.humidity,
            FeatureKey::Ph => self.ph,
            FeatureKey::Rainfall => self.rainfall,
        }
    }
}

/// Reset values used by the clear action
impl Default for FeatureVector {
    fn default() -> Self {
        let mut defaults = [0.0; N_FEATURES];
        for (slot, spec) in defaults.iter_mut().zip(FEATURES.iter()) {
            *slot = spec.default;
        }
        let [n, p, k, temperature, humidity, ph, rainfall] = defaults;
        Self {
            n,
            p,
            k,
            temperature,
            humidity,
            ph,
            rainfall,
        }
    }
}

/// Column identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    N,
    P,
    K,
    Temperature,
    Humidity,
    Ph,
    Rainfall,
}

impl FeatureKey {
    /// Form field / JSON field name
    pub fn field_name(self) -> &'static str {
        match self {
            FeatureKey::N => "n",
            FeatureKey::P => "p",
            FeatureKey::K => "k",
            FeatureKey::Temperature => "temperature",
            FeatureKey::Humidity => "humidity",
            FeatureKey::Ph => "ph",
            FeatureKey::Rainfall => "rainfall",
        }
    }
}

/// Which UI column a slider belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureGroup {
    Soil,
    Climate,
}

/// Slider metadata for one feature
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeatureSpec {
    pub key: FeatureKey,
    pub label: &'static str,
    pub report_label: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
    pub group: FeatureGroup,
}

impl FeatureSpec {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// All features in column order
pub static FEATURES: [FeatureSpec; N_FEATURES] = [
    FeatureSpec {
        key: FeatureKey::N,
        label: "💚 Nitrogen (N)",
        report_label: "Nitrogen (N)",
        unit: "",
        min: 0.0,
        max: 140.0,
        default: 50.0,
        step: 1.0,
        group: FeatureGroup::Soil,
    },
    FeatureSpec {
        key: FeatureKey::P,
        label: "🟠 Phosphorus (P)",
        report_label: "Phosphorus (P)",
        unit: "",
        min: 5.0,
        max: 145.0,
        default: 53.0,
        step: 1.0,
        group: FeatureGroup::Soil,
    },
    FeatureSpec {
        key: FeatureKey::K,
        label: "🔵 Potassium (K)",
        report_label: "Potassium (K)",
        unit: "",
        min: 5.0,
        max: 205.0,
        default: 48.0,
        step: 1.0,
        group: FeatureGroup::Soil,
    },
    FeatureSpec {
        key: FeatureKey::Temperature,
        label: "🌡️ Temperature (°C)",
        report_label: "Temperature",
        unit: "°C",
        min: 8.0,
        max: 44.0,
        default: 25.0,
        step: 0.1,
        group: FeatureGroup::Climate,
    },
    FeatureSpec {
        key: FeatureKey::Humidity,
        label: "💧 Humidity (%)",
        report_label: "Humidity",
        unit: "%",
        min: 14.0,
        max: 100.0,
        default: 71.0,
        step: 0.1,
        group: FeatureGroup::Climate,
    },
    FeatureSpec {
        key: FeatureKey::Ph,
        label: "⚗️ Soil pH",
        report_label: "pH",
        unit: "",
        min: 3.5,
        max: 10.0,
        default: 6.5,
        step: 0.1,
        group: FeatureGroup::Soil,
    },
    FeatureSpec {
        key: FeatureKey::Rainfall,
        label: "🌧️ Rainfall (mm)",
        report_label: "Rainfall",
        unit: " mm",
        min: 20.0,
        max: 300.0,
        default: 103.0,
        step: 0.1,
        group: FeatureGroup::Climate,
    },
];

/// Example input row shown under the form
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub features: FeatureVector,
}

pub static PRESETS: [Preset; 3] = [
    Preset {
        name: "Rice paddy",
        features: FeatureVector {
            n: 90.0,
            p: 42.0,
            k: 43.0,
            temperature: 20.8,
            humidity: 82.0,
            ph: 6.5,
            rainfall: 203.0,
        },
    },
    Preset {
        name: "Maize field",
        features: FeatureVector {
            n: 20.0,
            p: 67.0,
            k: 20.0,
            temperature: 26.0,
            humidity: 52.0,
            ph: 5.9,
            rainfall: 60.0,
        },
    },
    Preset {
        name: "Banana plantation",
        features: FeatureVector {
            n: 80.0,
            p: 40.0,
            k: 40.0,
            temperature: 20.0,
            humidity: 80.0,
            ph: 6.5,
            rainfall: 200.0,
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_clear_values() {
        let d = FeatureVector::default();
        assert_eq!(d.to_row(), [50.0, 53.0, 48.0, 25.0, 71.0, 6.5, 103.0]);
    }

    #[test]
    fn from_slice_keeps_column_order() {
        let fv = FeatureVector::from_slice(&[90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 203.0]).unwrap();
        assert_eq!(fv, PRESETS[0].features);
        assert_eq!(fv.get(FeatureKey::Ph), 6.5);
        assert_eq!(fv.get(FeatureKey::Rainfall), 203.0);
    }

    #[test]
    fn from_slice_rejects_wrong_length() {
        assert_eq!(
            FeatureVector::from_slice(&[1.0, 2.0]),
            Err(FeatureError::WrongLength { expected: 7, actual: 2 })
        );
        assert!(FeatureVector::from_slice(&[0.0; 8]).is_err());
        assert!(FeatureVector::from_slice(&[]).is_err());
    }

    #[test]
    fn defaults_and_presets_are_within_ranges() {
        for spec in &FEATURES {
            assert!(spec.contains(spec.default), "{:?}", spec.key);
        }
        for preset in &PRESETS {
            for spec in &FEATURES {
                assert!(spec.contains(preset.features.get(spec.key)), "{}", preset.name);
            }
        }
    }

    #[test]
    fn groups_split_soil_and_climate() {
        let soil: Vec<_> = FEATURES
            .iter()
            .filter(|f| f.group == FeatureGroup::Soil)
            .map(|f| f.key.field_name())
            .collect();
        assert_eq!(soil, ["n", "p", "k", "ph"]);
    }

    #[test]
    fn json_field_names_match_keys() {
        let value = serde_json::to_value(FeatureVector::default()).unwrap();
        for spec in &FEATURES {
            assert!(value.get(spec.key.field_name()).is_some());
        }
    }
}
