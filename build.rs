use std::env;

fn main() {
    // Only the AVR port needs link arguments; host builds and tests run clean.
    let target = env::var("TARGET").unwrap_or_default();
    if target.contains("avr") {
        println!("cargo:rustc-link-arg=-mmcu=atmega128a");
        // Pass CPU frequency for timing calculations
        println!("cargo:rustc-env=MCU_FREQ_HZ=16000000");
    }
}
