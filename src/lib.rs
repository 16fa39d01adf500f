//! Rust front end to the PROSAIL (PROSPECT + SAIL) leaf and canopy reflectance
//! model.
//!
//! The radiative transfer itself is done by an external kernel (see
//! [`kernel::ReflectanceKernel`]). This crate checks and normalises the inputs,
//! in particular the leaf angle distribution, calls the kernel and returns the
//! result as a wavelength-labelled [`ReflectanceSpectrum`].

pub mod batch;
pub mod config;
pub mod error;
pub mod kernel;
pub mod lidf;
pub mod model;
pub mod params;
pub mod solar;
pub mod spectrum;

pub use error::{InvalidParameter, ProsailError};
pub use kernel::{KernelInputs, ReflectanceKernel};
pub use lidf::{LeafAngleDistribution, LidfType};
pub use model::{run, run_raw};
pub use params::{ModelParameters, ViewGeometry};
pub use spectrum::{ReflectanceSpectrum, WavelengthUnit};
