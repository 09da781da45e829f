#![no_main]

use libfuzzer_sys::fuzz_target;
use polymur_proof_core::{fold, max_fold_bound};

fn read_u128(bytes: &[u8]) -> u128 {
    let mut buf = [0u8; 16];
    let n = bytes.len().min(16);
    buf[..n].copy_from_slice(&bytes[..n]);
    u128::from_le_bytes(buf)
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 32 {
        return;
    }
    // Keep n below 2^125 so n + 1 cannot overflow.
    let n = read_u128(&data[..16]) >> 3;
    let d = read_u128(&data[16..32]);
    let x = n - d % (n + 1);

    let bound = max_fold_bound(n);
    if fold(x) > bound {
        panic!("fold({}) = {} exceeds max_fold_bound({}) = {}", x, fold(x), n, bound);
    }
});
