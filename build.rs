use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds only compile the portable library and its tests
    let target = env::var("TARGET").unwrap_or_default();
    if !target.contains("avr") {
        return;
    }

    // Configure for ATmega128
    println!("cargo:rustc-link-arg-bins=-mmcu=atmega128");

    println!("cargo:warning=Building for ATmega128 at 16MHz");
}
