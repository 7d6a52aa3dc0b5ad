use std::fs;
use std::path::PathBuf;

fn main() {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let version_path = manifest_dir.join("../../VERSION");
    println!("cargo:rerun-if-changed={}", version_path.display());

    // Packaged builds have no workspace root; the crate version stands in.
    let version = match fs::read_to_string(&version_path) {
        Ok(raw) => raw.trim().to_string(),
        Err(_) => std::env::var("CARGO_PKG_VERSION").expect("package version"),
    };
    assert!(!version.is_empty(), "VERSION file must not be empty");

    println!("cargo:rustc-env=FOOD_LENS_VERSION={version}");
}
