use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SNDFILE_LIB_DIR");
    println!("cargo:rerun-if-env-changed=SNDFILE_STATIC");
    println!("cargo:rustc-check-cfg=cfg(sndfile_stub)");

    let want_static = env::var("CARGO_FEATURE_STATIC").is_ok()
        || env::var("SNDFILE_STATIC").is_ok();

    // Check if we're in a docs.rs build
    if env::var("DOCS_RS").is_ok() {
        println!("cargo:warning=Building on docs.rs - compiling stub bindings");
        use_stub_bindings();
        return;
    }

    // An explicit library directory wins over pkg-config
    if let Some(lib_dir) = env::var_os("SNDFILE_LIB_DIR").map(PathBuf::from) {
        if !lib_dir.exists() {
            println!("cargo:warning=SNDFILE_LIB_DIR does not exist: {:?}", lib_dir);
            use_stub_bindings();
            return;
        }
        println!("cargo:rustc-link-search=native={}", lib_dir.display());
        link_sndfile(want_static);
        println!("cargo:lib_dir={}", lib_dir.display());
        return;
    }

    match try_pkg_config(want_static) {
        Some(include_path) => {
            println!("cargo:include={}", include_path.display());
        }
        None => {
            println!("cargo:warning=libsndfile not available - compiling stub bindings");
            println!("cargo:warning=The crate will compile but every call reports failure at runtime");
            use_stub_bindings();
        }
    }
}

/// Try to find libsndfile using pkg-config.
///
/// On success pkg-config has already printed the link directives.
fn try_pkg_config(want_static: bool) -> Option<PathBuf> {
    match pkg_config::Config::new()
        .atleast_version("1.0.25")
        .statik(want_static)
        .probe("sndfile")
    {
        Ok(lib) => {
            let include_path = lib
                .include_paths
                .first()
                .cloned()
                .unwrap_or_else(|| PathBuf::from("/usr/include"));

            println!("cargo:info=Found libsndfile {} via pkg-config", lib.version);
            Some(include_path)
        }
        Err(e) => {
            println!("cargo:warning=pkg-config error: {}", e);
            None
        }
    }
}

fn link_sndfile(want_static: bool) {
    let name = if cfg!(windows) { "sndfile-1" } else { "sndfile" };
    if want_static {
        println!("cargo:rustc-link-lib=static={}", name);
    } else {
        println!("cargo:rustc-link-lib={}", name);
    }
}

/// Switch the crate to its Rust stubs. Dependents can read `DEP_SNDFILE_STUB`.
fn use_stub_bindings() {
    println!("cargo:rustc-cfg=sndfile_stub");
    println!("cargo:stub=1");
}
