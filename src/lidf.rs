//! Leaf inclination distribution function (LIDF) parameterisation.
//!
//! PROSAIL accepts the canopy leaf-angle distribution in one of two forms:
//!
//! - **Two-parameter** (`TypeLidf = 1`): an average leaf slope `a` and a
//!   bimodality coefficient `b`, with `a + b <= 1.0`.
//! - **Ellipsoidal** (`TypeLidf = 2`): a single average leaf angle in degrees,
//!   0 being planophile (horizontal leaves) and 90 erectophile (vertical leaves).
//!
//! The kernel always receives the canonical triple `(TypeLidf, LIDFa, LIDFb)`,
//! see [`LeafAngleDistribution::canonical`].
//!
//! ## Usage Example
//!
//! ```rust
//! use prosail::lidf::{LeafAngleDistribution, LidfType};
//!
//! let lidf = LeafAngleDistribution::from_average_angle(30.0);
//! assert_eq!(lidf.canonical(), (LidfType::Ellipsoidal, 30.0, 0.0));
//!
//! let lidf = LeafAngleDistribution::PLANOPHILE;
//! assert_eq!(lidf.canonical(), (LidfType::TwoParameter, 1.0, 0.0));
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::InvalidParameter;

/// Upper bound on `slope + bimodality` for the two-parameter form.
pub const MAX_SLOPE_BIMODALITY_SUM: f64 = 1.0;

/// Discriminator passed to the kernel as `TypeLidf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum LidfType {
    TwoParameter = 1,
    Ellipsoidal = 2,
}

impl LidfType {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for LidfType {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(LidfType::TwoParameter),
            2 => Ok(LidfType::Ellipsoidal),
            other => Err(other),
        }
    }
}

impl fmt::Display for LidfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LidfType::TwoParameter => write!(f, "two-parameter (1)"),
            LidfType::Ellipsoidal => write!(f, "ellipsoidal (2)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeafAngleDistribution {
    /// Average leaf angle in degrees.
    Ellipsoidal { average_angle: f64 },
    TwoParameter { slope: f64, bimodality: f64 },
}

impl LeafAngleDistribution {
    pub const PLANOPHILE: Self = Self::two_parameter(1.0, 0.0);
    pub const ERECTOPHILE: Self = Self::two_parameter(-1.0, 0.0);
    pub const PLAGIOPHILE: Self = Self::two_parameter(0.0, -1.0);
    pub const EXTREMOPHILE: Self = Self::two_parameter(0.0, 1.0);
    pub const SPHERICAL: Self = Self::two_parameter(-0.35, -0.15);
    pub const UNIFORM: Self = Self::two_parameter(0.0, 0.0);

    /// Named presets, in the order they are usually listed.
    pub const PRESETS: [(&'static str, Self); 6] = [
        ("planophile", Self::PLANOPHILE),
        ("erectophile", Self::ERECTOPHILE),
        ("plagiophile", Self::PLAGIOPHILE),
        ("extremophile", Self::EXTREMOPHILE),
        ("spherical", Self::SPHERICAL),
        ("uniform", Self::UNIFORM),
    ];

    const fn two_parameter(slope: f64, bimodality: f64) -> Self {
        Self::TwoParameter { slope, bimodality }
    }

    pub fn from_average_angle(degrees: f64) -> Self {
        Self::Ellipsoidal {
            average_angle: degrees,
        }
    }

    pub fn from_slope_and_bimodality(
        slope: f64,
        bimodality: f64,
    ) -> Result<Self, InvalidParameter> {
        let lidf = Self::two_parameter(slope, bimodality);
        lidf.validate()?;
        Ok(lidf)
    }

    /// Case-insensitive lookup of a named preset.
    pub fn preset(name: &str) -> Option<Self> {
        Self::PRESETS
            .iter()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
            .map(|&(_, lidf)| lidf)
    }

    pub fn lidf_type(&self) -> LidfType {
        match self {
            Self::Ellipsoidal { .. } => LidfType::Ellipsoidal,
            Self::TwoParameter { .. } => LidfType::TwoParameter,
        }
    }

    /// The `(TypeLidf, LIDFa, LIDFb)` triple expected by the kernel.
    pub fn canonical(&self) -> (LidfType, f64, f64) {
        match *self {
            Self::Ellipsoidal { average_angle } => (LidfType::Ellipsoidal, average_angle, 0.0),
            Self::TwoParameter { slope, bimodality } => {
                (LidfType::TwoParameter, slope, bimodality)
            }
        }
    }

    pub fn validate(&self) -> Result<(), InvalidParameter> {
        match *self {
            Self::TwoParameter { slope, bimodality } => check_slope_bimodality(slope, bimodality),
            Self::Ellipsoidal { .. } => Ok(()),
        }
    }
}

pub(crate) fn check_slope_bimodality(slope: f64, bimodality: f64) -> Result<(), InvalidParameter> {
    let sum = slope + bimodality;
    // NaN sums are not "greater than" anything, so reject them explicitly.
    if sum > MAX_SLOPE_BIMODALITY_SUM || sum.is_nan() {
        return Err(InvalidParameter::LidfSumExceeded {
            slope,
            bimodality,
            sum,
        });
    }
    Ok(())
}

impl fmt::Display for LeafAngleDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((name, _)) = Self::PRESETS.iter().find(|(_, lidf)| lidf == self) {
            return write!(f, "{name}");
        }
        match self {
            Self::Ellipsoidal { average_angle } => write!(f, "ellipsoidal({average_angle}°)"),
            Self::TwoParameter { slope, bimodality } => {
                write!(f, "two-parameter(a={slope}, b={bimodality})")
            }
        }
    }
}

// On disk the LIDF keeps its loose shape: a bare number is an average angle,
// a two-element array is (slope, bimodality) and a string names a preset.
impl<'de> Deserialize<'de> for LeafAngleDistribution {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum LidfHelper {
            Angle(f64),
            Pair(Vec<f64>),
            Preset(String),
        }

        match LidfHelper::deserialize(deserializer)? {
            LidfHelper::Angle(degrees) => Ok(Self::from_average_angle(degrees)),
            LidfHelper::Pair(values) => match values.as_slice() {
                &[slope, bimodality] => {
                    Self::from_slope_and_bimodality(slope, bimodality).map_err(D::Error::custom)
                }
                other => Err(D::Error::custom(format!(
                    "LIDF pair must have exactly 2 values (slope, bimodality), got {}",
                    other.len()
                ))),
            },
            LidfHelper::Preset(name) => Self::preset(&name)
                .ok_or_else(|| D::Error::custom(format!("Unknown LIDF preset: {name}"))),
        }
    }
}

impl Serialize for LeafAngleDistribution {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Self::Ellipsoidal { average_angle } => serializer.serialize_f64(average_angle),
            Self::TwoParameter { slope, bimodality } => [slope, bimodality].serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_two_parameter_with_declared_values() {
        let expected = [
            (LeafAngleDistribution::PLANOPHILE, 1.0, 0.0),
            (LeafAngleDistribution::ERECTOPHILE, -1.0, 0.0),
            (LeafAngleDistribution::PLAGIOPHILE, 0.0, -1.0),
            (LeafAngleDistribution::EXTREMOPHILE, 0.0, 1.0),
            (LeafAngleDistribution::SPHERICAL, -0.35, -0.15),
            (LeafAngleDistribution::UNIFORM, 0.0, 0.0),
        ];

        for (lidf, a, b) in expected {
            assert_eq!(lidf.canonical(), (LidfType::TwoParameter, a, b));
            assert!(lidf.validate().is_ok(), "{lidf} should be valid");
        }
    }

    #[test]
    fn test_average_angle_is_ellipsoidal() {
        for angle in [30.0, 57.3, 90.0] {
            let lidf = LeafAngleDistribution::from_average_angle(angle);
            assert_eq!(lidf.canonical(), (LidfType::Ellipsoidal, angle, 0.0));
        }
    }

    #[test]
    fn test_slope_bimodality_sum_limit() {
        assert!(LeafAngleDistribution::from_slope_and_bimodality(0.5, 0.5).is_ok());
        assert!(LeafAngleDistribution::from_slope_and_bimodality(-1.0, 0.3).is_ok());

        let err = LeafAngleDistribution::from_slope_and_bimodality(0.9, 0.5).unwrap_err();
        let InvalidParameter::LidfSumExceeded { sum, .. } = err;
        assert!((sum - 1.4).abs() < 1e-12);

        assert!(LeafAngleDistribution::from_slope_and_bimodality(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_literal_variant_is_revalidated() {
        let lidf = LeafAngleDistribution::TwoParameter {
            slope: 1.0,
            bimodality: 0.2,
        };
        assert!(lidf.validate().is_err());
    }

    #[test]
    fn test_lidf_type_codes() {
        assert_eq!(LidfType::TwoParameter.code(), 1);
        assert_eq!(LidfType::Ellipsoidal.code(), 2);
        assert_eq!(LidfType::try_from(1), Ok(LidfType::TwoParameter));
        assert_eq!(LidfType::try_from(2), Ok(LidfType::Ellipsoidal));
        assert_eq!(LidfType::try_from(0), Err(0));
        assert_eq!(LidfType::try_from(3), Err(3));
    }

    #[test]
    fn test_preset_lookup_ignores_case() {
        assert_eq!(
            LeafAngleDistribution::preset("Spherical"),
            Some(LeafAngleDistribution::SPHERICAL)
        );
        assert_eq!(LeafAngleDistribution::preset("conical"), None);
    }

    #[test]
    fn test_deserialize_accepts_all_shapes() {
        let angle: LeafAngleDistribution = serde_json::from_str("57.3").unwrap();
        assert_eq!(angle, LeafAngleDistribution::from_average_angle(57.3));

        let integer: LeafAngleDistribution = serde_json::from_str("30").unwrap();
        assert_eq!(integer, LeafAngleDistribution::from_average_angle(30.0));

        let pair: LeafAngleDistribution = serde_json::from_str("[0, -1]").unwrap();
        assert_eq!(pair, LeafAngleDistribution::PLAGIOPHILE);

        let preset: LeafAngleDistribution = serde_json::from_str("\"erectophile\"").unwrap();
        assert_eq!(preset, LeafAngleDistribution::ERECTOPHILE);
    }

    #[test]
    fn test_deserialize_rejects_bad_shapes() {
        assert!(serde_json::from_str::<LeafAngleDistribution>("[1.0]").is_err());
        assert!(serde_json::from_str::<LeafAngleDistribution>("[0.1, 0.2, 0.3]").is_err());
        assert!(serde_json::from_str::<LeafAngleDistribution>("[0.9, 0.5]").is_err());
        assert!(serde_json::from_str::<LeafAngleDistribution>("\"conical\"").is_err());
    }

    #[test]
    fn test_serialize_keeps_shape() {
        let json = serde_json::to_string(&LeafAngleDistribution::SPHERICAL).unwrap();
        assert_eq!(json, "[-0.35,-0.15]");

        let json = serde_json::to_string(&LeafAngleDistribution::from_average_angle(30.0)).unwrap();
        assert_eq!(json, "30.0");
    }

    #[test]
    fn test_display_names_presets() {
        assert_eq!(LeafAngleDistribution::UNIFORM.to_string(), "uniform");
        assert_eq!(
            LeafAngleDistribution::from_average_angle(45.0).to_string(),
            "ellipsoidal(45°)"
        );
    }
}
