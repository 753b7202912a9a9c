#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = jpeg565::Decoder::new();

    let _ = decoder.decode_buffer(data, |_y, _row| {});
});
