//! Build script for the FM receiver firmware
//!
//! The linker script comes from embassy-stm32's `memory-x` feature; this
//! only makes sure Cargo re-runs when the script itself changes.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
}
