// boot/build.rs
use std::path::PathBuf;

fn main() {
    let target = std::env::var("TARGET").unwrap_or_default();

    // Скрипт линковки только для 16-битного target
    // Linker script only for the 16-bit target
    if target.contains("code16") {
        println!("cargo:rerun-if-changed=link.ld");

        let script = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap()).join("link.ld");
        println!("cargo:rustc-link-arg=-T{}", script.display());

        // Карта линковки рядом с остальными артефактами сборки
        // Link map goes next to the other build artifacts
        let map = PathBuf::from(std::env::var("OUT_DIR").unwrap()).join("bootsect.map");
        println!("cargo:rustc-link-arg=-Map={}", map.display());
    }
}
