#![no_main]

use libfuzzer_sys::fuzz_target;
use polymur_proof_core::{coverage, layout};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // Bounded length to keep fuzz runs cheap.
    let length = usize::from(u16::from_le_bytes([data[0], data[1]]) % 8192);
    if let Err(e) = coverage(length, &layout(length)) {
        panic!("layout for length {} does not cover the input: {}", length, e);
    }
});
