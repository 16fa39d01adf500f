use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::kernel::KernelOutput;

/// First wavelength of the PROSAIL grid (nm).
pub const WAVELENGTH_MIN_NM: u32 = 400;
/// Last wavelength of the PROSAIL grid (nm), inclusive.
pub const WAVELENGTH_MAX_NM: u32 = 2500;
pub const N_WAVELENGTHS: usize = (WAVELENGTH_MAX_NM - WAVELENGTH_MIN_NM + 1) as usize;

/// Unit of the wavelength column when the spectrum is exported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavelengthUnit {
    #[default]
    #[serde(rename = "nm")]
    Nanometers,
    #[serde(rename = "um")]
    Micrometers,
}

impl WavelengthUnit {
    pub fn convert(self, nm: u32) -> f64 {
        match self {
            WavelengthUnit::Nanometers => nm as f64,
            WavelengthUnit::Micrometers => nm as f64 / 1000.0,
        }
    }
}

/// Canopy bi-directional reflectance factor, one value per nanometre from
/// 400 to 2500 nm.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectanceSpectrum {
    reflectance: KernelOutput,
}

impl ReflectanceSpectrum {
    /// Row `i` of the kernel output is wavelength `400 + i` nm.
    pub fn from_kernel_output(reflectance: KernelOutput) -> Self {
        Self { reflectance }
    }

    pub fn len(&self) -> usize {
        self.reflectance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reflectance.is_empty()
    }

    pub fn reflectance(&self) -> &[f64] {
        &self.reflectance[..]
    }

    pub fn wavelengths_nm(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len()).map(|i| WAVELENGTH_MIN_NM + i as u32)
    }

    pub fn wavelengths_um(&self) -> impl Iterator<Item = f64> + '_ {
        self.wavelengths_nm()
            .map(|nm| WavelengthUnit::Micrometers.convert(nm))
    }

    /// `(wavelength_nm, reflectance)` in ascending wavelength order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.wavelengths_nm().zip(self.reflectance.iter().copied())
    }

    /// Reflectance at an integer wavelength, `None` outside 400–2500 nm.
    pub fn get(&self, wavelength_nm: u32) -> Option<f64> {
        let idx = wavelength_nm.checked_sub(WAVELENGTH_MIN_NM)? as usize;
        self.reflectance.get(idx).copied()
    }

    /// The two-column `[wavelength, reflectance]` table.
    pub fn rows(&self, unit: WavelengthUnit) -> Vec<[f64; 2]> {
        self.iter().map(|(nm, r)| [unit.convert(nm), r]).collect()
    }

    pub fn to_rows(&self, unit: WavelengthUnit) -> SpectrumRows {
        SpectrumRows {
            unit,
            rows: self.rows(unit),
        }
    }

    pub fn to_json_file<P: AsRef<Path>>(
        &self,
        path: P,
        unit: WavelengthUnit,
    ) -> Result<(), std::io::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &self.to_rows(unit))?;
        writer.flush()
    }

    fn min_max(&self) -> (f64, f64) {
        self.reflectance
            .iter()
            .filter(|r| !r.is_nan())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                (lo.min(r), hi.max(r))
            })
    }
}

/// Serializable view of a spectrum in a chosen wavelength unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumRows {
    pub unit: WavelengthUnit,
    pub rows: Vec<[f64; 2]>,
}

impl Display for ReflectanceSpectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (min, max) = self.min_max();
        write!(
            f,
            "Rows: {}\nWavelengths: {}-{} nm\nMin reflectance: {:.5}\nMax reflectance: {:.5}",
            self.len(),
            WAVELENGTH_MIN_NM,
            WAVELENGTH_MAX_NM,
            min,
            max,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ramp() -> ReflectanceSpectrum {
        let mut values = Box::new([0.0; N_WAVELENGTHS]);
        for (i, v) in values.iter_mut().enumerate() {
            *v = i as f64 / N_WAVELENGTHS as f64;
        }
        ReflectanceSpectrum::from_kernel_output(values)
    }

    #[test]
    fn test_grid_size() {
        assert_eq!(N_WAVELENGTHS, 2101);
        assert_eq!(ramp().len(), 2101);
    }

    #[test]
    fn test_row_index_matches_wavelength() {
        let spectrum = ramp();
        let rows = spectrum.rows(WavelengthUnit::Nanometers);

        assert_eq!(rows.len(), 2101);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row[0], 400.0 + i as f64);
            assert_eq!(row[1], spectrum.reflectance()[i]);
        }
        assert_eq!(rows[0][0], 400.0);
        assert_eq!(rows[2100][0], 2500.0);
    }

    #[test]
    fn test_micrometer_rows() {
        let rows = ramp().rows(WavelengthUnit::Micrometers);

        assert_eq!(rows[0][0], 0.4);
        assert_eq!(rows[2100][0], 2.5);
        // reflectance column is never rescaled
        assert_eq!(rows[10][1], ramp().rows(WavelengthUnit::Nanometers)[10][1]);
    }

    #[test]
    fn test_wavelengths_um() {
        let spectrum = ramp();
        let um: Vec<f64> = spectrum.wavelengths_um().collect();

        assert_eq!(um.len(), 2101);
        assert_eq!(um[0], 0.4);
        assert_eq!(um[1000], 1.4);
        assert_eq!(um[2100], 2.5);
        let nm: Vec<u32> = spectrum.wavelengths_nm().collect();
        assert_eq!(um[600], nm[600] as f64 / 1000.0);
    }

    #[test]
    fn test_get_by_wavelength() {
        let spectrum = ramp();

        assert_eq!(spectrum.get(400), Some(0.0));
        assert_eq!(spectrum.get(2500), Some(spectrum.reflectance()[2100]));
        assert_eq!(spectrum.get(399), None);
        assert_eq!(spectrum.get(2501), None);
    }

    #[test]
    fn test_json_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spectrum.json");

        ramp().to_json_file(&path, WavelengthUnit::Micrometers).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: SpectrumRows = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.unit, WavelengthUnit::Micrometers);
        assert_eq!(parsed.rows.len(), 2101);
        assert_eq!(parsed.rows[0], [0.4, 0.0]);
    }

    #[test]
    fn test_display_summary() {
        let text = ramp().to_string();
        assert!(text.contains("Rows: 2101"), "{text}");
        assert!(text.contains("400-2500 nm"), "{text}");
    }
}
