//! The external radiative-transfer kernel.
//!
//! PROSPECT leaf optics and SAIL canopy scattering are computed by a compiled
//! model outside this crate. Everything here sees it through [`ReflectanceKernel`]:
//! fifteen positional scalars in, 2101 reflectances (400–2500 nm, 1 nm step) out.

use crate::lidf::LidfType;
use crate::spectrum::N_WAVELENGTHS;

/// Opaque failure raised by a kernel implementation.
pub type KernelError = Box<dyn std::error::Error + Send + Sync>;

/// Raw kernel output, one reflectance per wavelength.
pub type KernelOutput = Box<[f64; N_WAVELENGTHS]>;

/// Kernel arguments in the kernel's positional order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelInputs {
    pub n: f64,
    pub cab: f64,
    pub car: f64,
    pub cbrown: f64,
    pub cw: f64,
    pub cm: f64,
    pub psoil: f64,
    pub lai: f64,
    pub hspot: f64,
    pub tts: f64,
    pub tto: f64,
    pub psi: f64,
    pub type_lidf: LidfType,
    pub lidf_a: f64,
    pub lidf_b: f64,
}

impl KernelInputs {
    /// `(N, Cab, Car, Cbrown, Cw, Cm, psoil, LAI, hspot, tts, tto, psi, TypeLidf, LIDFa, LIDFb)`
    pub fn as_positional(&self) -> [f64; 15] {
        [
            self.n,
            self.cab,
            self.car,
            self.cbrown,
            self.cw,
            self.cm,
            self.psoil,
            self.lai,
            self.hspot,
            self.tts,
            self.tto,
            self.psi,
            self.type_lidf.code() as f64,
            self.lidf_a,
            self.lidf_b,
        ]
    }
}

/// A PROSAIL implementation.
///
/// Implementations must be deterministic. Whether concurrent calls are safe is
/// up to each implementation; the `Sync` bound only promises that sharing a
/// reference is sound, so non-reentrant backends serialize internally.
pub trait ReflectanceKernel: Send + Sync {
    fn reflectance(&self, inputs: &KernelInputs) -> Result<KernelOutput, KernelError>;
}

impl<F> ReflectanceKernel for F
where
    F: Fn(&KernelInputs) -> Result<KernelOutput, KernelError> + Send + Sync,
{
    fn reflectance(&self, inputs: &KernelInputs) -> Result<KernelOutput, KernelError> {
        self(inputs)
    }
}

#[cfg(feature = "fortran")]
pub use fortran::FortranKernel;

#[cfg(feature = "fortran")]
mod fortran {
    use std::os::raw::c_int;
    use std::sync::Mutex;

    use super::{KernelError, KernelInputs, KernelOutput, ReflectanceKernel};
    use crate::spectrum::N_WAVELENGTHS;

    unsafe extern "C" {
        // PyPROSAIL.f90 `subroutine run(...)`; gfortran passes everything by reference.
        #[link_name = "run_"]
        fn prosail_run(
            n: *const f64,
            cab: *const f64,
            car: *const f64,
            cbrown: *const f64,
            cw: *const f64,
            cm: *const f64,
            psoil: *const f64,
            lai: *const f64,
            hspot: *const f64,
            tts: *const f64,
            tto: *const f64,
            psi: *const f64,
            type_lidf: *const c_int,
            lidf_a: *const f64,
            lidf_b: *const f64,
            retval: *mut f64,
        );
    }

    // MODULE_PRO4SAIL keeps its working arrays in module globals.
    static KERNEL_LOCK: Mutex<()> = Mutex::new(());

    /// Binding to the compiled PRO4SAIL library.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct FortranKernel;

    impl ReflectanceKernel for FortranKernel {
        fn reflectance(&self, inputs: &KernelInputs) -> Result<KernelOutput, KernelError> {
            let type_lidf: c_int = inputs.type_lidf.code();
            let mut out: KernelOutput = Box::new([0.0; N_WAVELENGTHS]);

            let _guard = KERNEL_LOCK
                .lock()
                .map_err(|_| KernelError::from("PROSAIL kernel lock poisoned"))?;

            // SAFETY: every pointer refers to a live value for the duration of the
            // call, and `out` holds exactly the 2101 doubles the routine writes.
            unsafe {
                prosail_run(
                    &inputs.n,
                    &inputs.cab,
                    &inputs.car,
                    &inputs.cbrown,
                    &inputs.cw,
                    &inputs.cm,
                    &inputs.psoil,
                    &inputs.lai,
                    &inputs.hspot,
                    &inputs.tts,
                    &inputs.tto,
                    &inputs.psi,
                    &type_lidf,
                    &inputs.lidf_a,
                    &inputs.lidf_b,
                    out.as_mut_ptr(),
                );
            }

            Ok(out)
        }
    }
}
