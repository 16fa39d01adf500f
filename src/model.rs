//! Parameter normalisation and result assembly around the PROSAIL kernel.
//!
//! Both entry points follow the same pipeline:
//!
//! 1. reduce the leaf angle distribution to `(TypeLidf, LIDFa, LIDFb)`
//! 2. check `TypeLidf` is 1 or 2, and for type 1 that `LIDFa + LIDFb <= 1`
//! 3. call the kernel with the fifteen positional arguments
//! 4. label the 2101 returned values with wavelengths 400..=2500 nm
//!
//! A failed check returns before the kernel is called. Kernel failures are
//! passed through as [`ProsailError::Kernel`] with the original error as source.
//!
//! ## Usage Example
//!
//! ```rust
//! use prosail::kernel::{KernelError, KernelInputs, KernelOutput};
//! use prosail::spectrum::N_WAVELENGTHS;
//! use prosail::{run, LeafAngleDistribution, ModelParameters};
//!
//! // Stand-in for the compiled model.
//! let kernel = |_: &KernelInputs| -> Result<KernelOutput, KernelError> {
//!     Ok(Box::new([0.05; N_WAVELENGTHS]))
//! };
//!
//! let params = ModelParameters::new(
//!     1.5, 40.0, 8.0, 0.0, 0.01, 0.009, 1.0, 3.0, 0.01, 30.0, 0.0, 10.0,
//!     LeafAngleDistribution::PLANOPHILE,
//! );
//!
//! let spectrum = run(&params, &kernel).unwrap();
//! assert_eq!(spectrum.len(), 2101);
//! assert_eq!(spectrum.iter().next(), Some((400, 0.05)));
//! ```

use tracing::debug;

use crate::error::ProsailError;
use crate::kernel::ReflectanceKernel;
use crate::lidf::{LidfType, check_slope_bimodality};
use crate::params::ModelParameters;
use crate::spectrum::ReflectanceSpectrum;

/// Runs PROSAIL for `params`, taking the LIDF from `params.lidf`.
pub fn run<K>(params: &ModelParameters, kernel: &K) -> Result<ReflectanceSpectrum, ProsailError>
where
    K: ReflectanceKernel + ?Sized,
{
    let (type_lidf, lidf_a, lidf_b) = params.lidf.canonical();
    run_raw(params, type_lidf.code(), lidf_a, lidf_b, kernel)
}

/// Runs PROSAIL with an explicit `TypeLidf` code, ignoring `params.lidf`.
///
/// `type_lidf` must be 1 (`lidf_a` = average slope, `lidf_b` = bimodality) or
/// 2 (`lidf_a` = average leaf angle in degrees, `lidf_b` unused).
pub fn run_raw<K>(
    params: &ModelParameters,
    type_lidf: i32,
    lidf_a: f64,
    lidf_b: f64,
    kernel: &K,
) -> Result<ReflectanceSpectrum, ProsailError>
where
    K: ReflectanceKernel + ?Sized,
{
    let type_lidf =
        LidfType::try_from(type_lidf).map_err(ProsailError::InvalidDiscriminator)?;

    if type_lidf == LidfType::TwoParameter {
        check_slope_bimodality(lidf_a, lidf_b)?;
    }

    let inputs = params.kernel_inputs(type_lidf, lidf_a, lidf_b);
    debug!(
        type_lidf = %type_lidf,
        lidf_a,
        lidf_b,
        lai = inputs.lai,
        tts = inputs.tts,
        "calling PROSAIL kernel"
    );

    let reflectance = kernel.reflectance(&inputs).map_err(ProsailError::Kernel)?;

    Ok(ReflectanceSpectrum::from_kernel_output(reflectance))
}
