//! Feature Scalers
//!
//! Transform-only mirrors of scikit-learn's `MinMaxScaler` and
//! `StandardScaler`. Field names follow the fitted attributes
//! (`min_`, `scale_`, `mean_`) without the trailing underscore.

use serde::{Deserialize, Serialize};

use super::{check_width, ModelError, Result};

/// Fitted MinMaxScaler: `x * scale + min`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub min: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default = "default_feature_range")]
    pub feature_range: (f64, f64),
    #[serde(default)]
    pub clip: bool,
}

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

impl MinMaxScaler {
    /// Build from the per-feature data bounds seen during fitting
    pub fn from_data_range(data_min: &[f64], data_max: &[f64]) -> Result<Self> {
        if data_min.len() != data_max.len() {
            return Err(ModelError::Invalid(
                "data_min and data_max differ in length".into(),
            ));
        }
        let (lo, hi) = default_feature_range();
        let scale: Vec<f64> = data_min
            .iter()
            .zip(data_max)
            .map(|(&mn, &mx)| {
                let range = mx - mn;
                // sklearn treats a constant column as range 1
                let range = if range == 0.0 { 1.0 } else { range };
                (hi - lo) / range
            })
            .collect();
        let min = data_min
            .iter()
            .zip(&scale)
            .map(|(&mn, &s)| lo - mn * s)
            .collect();
        Ok(Self {
            min,
            scale,
            feature_range: (lo, hi),
            clip: false,
        })
    }

    pub fn n_features(&self) -> usize {
        self.scale.len()
    }

    fn validate(&self) -> Result<()> {
        if self.min.len() != self.scale.len() {
            return Err(ModelError::Invalid(format!(
                "MinMaxScaler min has {} entries, scale has {}",
                self.min.len(),
                self.scale.len()
            )));
        }
        if self.feature_range.0 >= self.feature_range.1 {
            return Err(ModelError::Invalid(format!(
                "MinMaxScaler feature_range {:?} is not increasing",
                self.feature_range
            )));
        }
        Ok(())
    }

    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>> {
        check_width("MinMaxScaler", self.n_features(), x)?;
        let (lo, hi) = self.feature_range;
        Ok(x.iter()
            .zip(self.scale.iter().zip(&self.min))
            .map(|(&v, (&s, &m))| {
                let t = v * s + m;
                if self.clip {
                    t.clamp(lo, hi)
                } else {
                    t
                }
            })
            .collect())
    }
}

/// Fitted StandardScaler: `(x - mean) / scale`
///
/// Either term is absent when the scaler was fitted with
/// `with_mean=False` / `with_std=False`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub n_features: usize,
    #[serde(default)]
    pub mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
}

impl StandardScaler {
    fn validate(&self) -> Result<()> {
        for (name, v) in [("mean", &self.mean), ("scale", &self.scale)] {
            if let Some(v) = v {
                if v.len() != self.n_features {
                    return Err(ModelError::Invalid(format!(
                        "StandardScaler {} has {} entries, expected {}",
                        name,
                        v.len(),
                        self.n_features
                    )));
                }
            }
        }
        if let Some(scale) = &self.scale {
            if scale.iter().any(|&s| s == 0.0) {
                return Err(ModelError::Invalid("StandardScaler scale contains zero".into()));
            }
        }
        Ok(())
    }

    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>> {
        check_width("StandardScaler", self.n_features, x)?;
        let mut out = x.to_vec();
        if let Some(mean) = &self.mean {
            out.iter_mut().zip(mean).for_each(|(v, m)| *v -= m);
        }
        if let Some(scale) = &self.scale {
            out.iter_mut().zip(scale).for_each(|(v, s)| *v /= s);
        }
        Ok(out)
    }
}

/// Any fitted scaler
#[derive(Debug, Clone)]
pub enum Scaler {
    MinMax(MinMaxScaler),
    Standard(StandardScaler),
}

impl Scaler {
    pub fn name(&self) -> &'static str {
        match self {
            Scaler::MinMax(_) => "MinMaxScaler",
            Scaler::Standard(_) => "StandardScaler",
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            Scaler::MinMax(s) => s.n_features(),
            Scaler::Standard(s) => s.n_features,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Scaler::MinMax(s) => s.validate(),
            Scaler::Standard(s) => s.validate(),
        }
    }

    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>> {
        match self {
            Scaler::MinMax(s) => s.transform(x),
            Scaler::Standard(s) => s.transform(x),
        }
    }
}
