#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Sniffed decode, with and without a TGA name: must never panic
    let _ = zenlegacy::decode(data, enough::Unstoppable);
    let _ = zenlegacy::decode_named(data, "fuzz.tga", enough::Unstoppable);
    let _ = zenlegacy::probe(data, Some("fuzz.tga"));

    // Each decoder on every input
    let _ = zenlegacy::decode_pcx(data, enough::Unstoppable);
    let _ = zenlegacy::decode_tga(data, enough::Unstoppable);
    let _ = zenlegacy::decode_tiff(data, enough::Unstoppable);
});
