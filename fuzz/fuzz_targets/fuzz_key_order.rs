#![no_main]

use libfuzzer_sys::fuzz_target;
use tsbench_core::{decode_key, encode_key};

fuzz_target!(|input: ((i64, i64, i64), (i64, i64, i64))| {
    // Ordering only holds for the non-negative domain the generator emits
    let clamp = |(a, b, c): (i64, i64, i64)| (a & i64::MAX, b & i64::MAX, c & i64::MAX);
    let (x, y) = (clamp(input.0), clamp(input.1));

    let kx = encode_key(x.0, x.1, x.2);
    let ky = encode_key(y.0, y.1, y.2);

    assert_eq!(kx.cmp(&ky), x.cmp(&y));
    assert_eq!(decode_key(&kx), Some(x));
});
