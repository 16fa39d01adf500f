use chrono::NaiveDateTime;

use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::lidf::LeafAngleDistribution;
use crate::params::{ModelParameters, ViewGeometry};
use crate::spectrum::WavelengthUnit;

pub mod error;
pub use error::ConfigError;

pub const ACQUISITION_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One PROSAIL run described in JSON.
///
/// ```json
/// {
///     "leaf": { "n": 1.5, "cab": 40, "car": 8, "cbrown": 0, "cw": 0.01, "cm": 0.009 },
///     "canopy": { "lai": 3, "hspot": 0.01, "psoil": 1 },
///     "geometry": { "tts": 30, "tto": 0, "psi": 10 },
///     "lidf": "planophile",
///     "wavelength_unit": "nm"
/// }
/// ```
///
/// `geometry` may also be given as `{ solar_zenith, solar_azimuth, view_zenith,
/// view_azimuth }`, or as `{ acquisition, latitude, longitude, view_zenith,
/// view_azimuth }` with `acquisition` a UTC timestamp (`2023-06-21T10:30:00`).
/// `lidf` is an average angle in degrees, a `[slope, bimodality]` pair or a
/// preset name.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    parameters: ModelParameters,
    wavelength_unit: WavelengthUnit,
}

// Resolves the geometry block to (tts, tto, psi) and checks acquisition
// coordinates while deserializing.
impl<'de> Deserialize<'de> for RunConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct ConfigHelper {
            leaf: LeafHelper,
            canopy: CanopyHelper,
            geometry: GeometryHelper,
            lidf: LeafAngleDistribution,
            #[serde(default)]
            wavelength_unit: WavelengthUnit,
        }

        #[derive(Deserialize)]
        struct LeafHelper {
            n: f64,
            cab: f64,
            car: f64,
            cbrown: f64,
            cw: f64,
            cm: f64,
        }

        #[derive(Deserialize)]
        struct CanopyHelper {
            lai: f64,
            hspot: f64,
            psoil: f64,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum GeometryHelper {
            Direct {
                tts: f64,
                tto: f64,
                psi: f64,
            },
            Azimuths {
                solar_zenith: f64,
                solar_azimuth: f64,
                view_zenith: f64,
                view_azimuth: f64,
            },
            Acquisition {
                acquisition: String,
                latitude: f64,
                longitude: f64,
                view_zenith: f64,
                view_azimuth: f64,
            },
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let geometry = match helper.geometry {
            GeometryHelper::Direct { tts, tto, psi } => ViewGeometry { tts, tto, psi },
            GeometryHelper::Azimuths {
                solar_zenith,
                solar_azimuth,
                view_zenith,
                view_azimuth,
            } => {
                ViewGeometry::from_azimuths(solar_zenith, solar_azimuth, view_zenith, view_azimuth)
            }
            GeometryHelper::Acquisition {
                acquisition,
                latitude,
                longitude,
                view_zenith,
                view_azimuth,
            } => acquisition_geometry(&acquisition, latitude, longitude, view_zenith, view_azimuth)
                .map_err(D::Error::custom)?,
        };

        let LeafHelper {
            n,
            cab,
            car,
            cbrown,
            cw,
            cm,
        } = helper.leaf;
        let CanopyHelper { lai, hspot, psoil } = helper.canopy;

        let parameters = ModelParameters::new(
            n,
            cab,
            car,
            cbrown,
            cw,
            cm,
            psoil,
            lai,
            hspot,
            geometry.tts,
            geometry.tto,
            geometry.psi,
            helper.lidf,
        );

        Ok(RunConfig {
            parameters,
            wavelength_unit: helper.wavelength_unit,
        })
    }
}

fn acquisition_geometry(
    acquisition: &str,
    latitude: f64,
    longitude: f64,
    view_zenith: f64,
    view_azimuth: f64,
) -> Result<ViewGeometry, ConfigError> {
    let datetime = NaiveDateTime::parse_from_str(acquisition, ACQUISITION_FORMAT)?;

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ConfigError::Latitude(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ConfigError::Longitude(longitude));
    }

    ViewGeometry::from_acquisition(datetime, latitude, longitude, view_zenith, view_azimuth).ok_or(
        ConfigError::SunBelowHorizon {
            datetime,
            latitude,
            longitude,
        },
    )
}

impl RunConfig {
    pub fn new(parameters: ModelParameters, wavelength_unit: WavelengthUnit) -> Self {
        Self {
            parameters,
            wavelength_unit,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<RunConfig, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: RunConfig = serde_json::from_reader(reader)?;

        Ok(config)
    }

    pub fn parameters(&self) -> &ModelParameters {
        &self.parameters
    }

    pub fn wavelength_unit(&self) -> WavelengthUnit {
        self.wavelength_unit
    }
}
