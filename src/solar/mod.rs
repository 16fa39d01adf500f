//! Solar position for a given acquisition time and location.
//!
//! Used to derive the PROSAIL solar zenith angle (`tts`) and, together with
//! the sensor azimuth, the relative azimuth (`psi`) from an image timestamp.
//! Time is UTC; the declination uses the Cooper (1969) approximation, which is
//! within a degree or so of an ephemeris and plenty for canopy geometry.

use chrono::{Datelike, NaiveDateTime, Timelike};

const D2R: f64 = std::f64::consts::PI / 180.0;
const R2D: f64 = 180.0 / std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    pub zenith_angle_deg: f64,
    /// Degrees clockwise from north, 0–360.
    pub azimuth_angle_deg: f64,
    pub altitude_angle_deg: f64,
    pub declination_deg: f64,
    pub hour_angle_deg: f64,
}

impl SolarPosition {
    /// # Arguments
    /// * `jday` - Day of year (1-366)
    /// * `hour` - Decimal hour, UTC (0.0-24.0)
    /// * `latitude` - Decimal degrees (-90 to +90)
    /// * `longitude` - Decimal degrees, east positive (-180 to +180)
    pub fn calculate(jday: u32, hour: f64, latitude: f64, longitude: f64) -> Self {
        let declination = 23.45 * D2R * (D2R * 360.0 * (284.0 + jday as f64) / 365.0).sin();

        // Local solar noon for a UTC clock, then degrees away from it (morning negative).
        let solar_noon = 12.0 - longitude / 15.0;
        let hour_angle = (hour - solar_noon) * 15.0 * D2R;

        let lat = latitude * D2R;
        let altitude = (lat.sin() * declination.sin()
            + lat.cos() * declination.cos() * hour_angle.cos())
        .clamp(-1.0, 1.0)
        .asin();

        let zenith = 90.0 - altitude * R2D;

        // Azimuth from north, measured clockwise.
        let cos_az = ((declination.sin() - altitude.sin() * lat.sin())
            / (altitude.cos() * lat.cos()))
        .clamp(-1.0, 1.0);
        let mut azimuth = cos_az.acos() * R2D;
        if hour_angle.sin() > 0.0 {
            azimuth = 360.0 - azimuth;
        }

        SolarPosition {
            zenith_angle_deg: zenith,
            azimuth_angle_deg: azimuth,
            altitude_angle_deg: altitude * R2D,
            declination_deg: declination * R2D,
            hour_angle_deg: hour_angle * R2D,
        }
    }

    pub fn from_datetime(datetime: NaiveDateTime, latitude: f64, longitude: f64) -> Self {
        let hour = datetime.num_seconds_from_midnight() as f64 / 3600.0;
        Self::calculate(datetime.ordinal(), hour, latitude, longitude)
    }

    pub fn is_above_horizon(&self) -> bool {
        self.altitude_angle_deg > 0.0
    }

    pub fn zenith_azimuth(&self) -> (f64, f64) {
        (self.zenith_angle_deg, self.azimuth_angle_deg)
    }
}
