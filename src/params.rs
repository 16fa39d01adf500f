use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::kernel::KernelInputs;
use crate::lidf::LeafAngleDistribution;
use crate::solar::SolarPosition;

/// Leaf, canopy and geometry inputs to PROSAIL.
///
/// Apart from the LIDF sum rule, nothing here is range-checked; physical
/// validity is left to the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Leaf structure coefficient
    pub n: f64,
    /// Chlorophyll a+b content (ug cm-2)
    pub cab: f64,
    /// Carotenoid content (ug cm-2)
    pub car: f64,
    /// Brown pigment content (arbitrary units)
    pub cbrown: f64,
    /// Equivalent water thickness (cm)
    pub cw: f64,
    /// Leaf mass per area (g cm-2)
    pub cm: f64,
    /// Soil reflectance factor: wet soil = 0, dry soil = 1
    pub psoil: f64,
    /// Leaf area index
    pub lai: f64,
    /// Hot spot parameter
    pub hspot: f64,
    /// Solar zenith angle (deg)
    pub tts: f64,
    /// Observer zenith angle (deg)
    pub tto: f64,
    /// Relative azimuth between sun and observer (deg)
    pub psi: f64,
    pub lidf: LeafAngleDistribution,
}

impl ModelParameters {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        n: f64,
        cab: f64,
        car: f64,
        cbrown: f64,
        cw: f64,
        cm: f64,
        psoil: f64,
        lai: f64,
        hspot: f64,
        tts: f64,
        tto: f64,
        psi: f64,
        lidf: LeafAngleDistribution,
    ) -> Self {
        Self {
            n,
            cab,
            car,
            cbrown,
            cw,
            cm,
            psoil,
            lai,
            hspot,
            tts,
            tto,
            psi,
            lidf,
        }
    }

    pub fn with_geometry(self, geometry: ViewGeometry) -> Self {
        Self {
            tts: geometry.tts,
            tto: geometry.tto,
            psi: geometry.psi,
            ..self
        }
    }

    pub fn with_lidf(self, lidf: LeafAngleDistribution) -> Self {
        Self { lidf, ..self }
    }

    pub fn geometry(&self) -> ViewGeometry {
        ViewGeometry {
            tts: self.tts,
            tto: self.tto,
            psi: self.psi,
        }
    }

    /// Kernel arguments with an explicit LIDF triple, which the caller has
    /// already checked.
    pub(crate) fn kernel_inputs(
        &self,
        type_lidf: crate::lidf::LidfType,
        lidf_a: f64,
        lidf_b: f64,
    ) -> KernelInputs {
        KernelInputs {
            n: self.n,
            cab: self.cab,
            car: self.car,
            cbrown: self.cbrown,
            cw: self.cw,
            cm: self.cm,
            psoil: self.psoil,
            lai: self.lai,
            hspot: self.hspot,
            tts: self.tts,
            tto: self.tto,
            psi: self.psi,
            type_lidf,
            lidf_a,
            lidf_b,
        }
    }
}

/// Sun/sensor geometry in the form PROSAIL wants it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewGeometry {
    pub tts: f64,
    pub tto: f64,
    pub psi: f64,
}

impl ViewGeometry {
    /// Relative azimuth is taken as `|view_azimuth - solar_azimuth|`, without
    /// folding into 0-180.
    pub fn from_azimuths(
        solar_zenith: f64,
        solar_azimuth: f64,
        view_zenith: f64,
        view_azimuth: f64,
    ) -> Self {
        Self {
            tts: solar_zenith,
            tto: view_zenith,
            psi: (view_azimuth - solar_azimuth).abs(),
        }
    }

    /// Geometry for an acquisition at `datetime` (UTC) over the given location.
    /// Returns `None` when the sun is below the horizon.
    pub fn from_acquisition(
        datetime: NaiveDateTime,
        latitude: f64,
        longitude: f64,
        view_zenith: f64,
        view_azimuth: f64,
    ) -> Option<Self> {
        let sun = SolarPosition::from_datetime(datetime, latitude, longitude);
        if !sun.is_above_horizon() {
            return None;
        }
        let (zenith, azimuth) = sun.zenith_azimuth();
        Some(Self::from_azimuths(zenith, azimuth, view_zenith, view_azimuth))
    }
}
