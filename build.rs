use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=PROSAIL_LIB_DIR");

    if env::var_os("CARGO_FEATURE_FORTRAN").is_none() {
        return;
    }

    if let Some(dir) = env::var_os("PROSAIL_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir.to_string_lossy());
    }
    println!("cargo:rustc-link-lib=dylib=prosail");
    println!("cargo:rustc-link-lib=dylib=gfortran");
}
