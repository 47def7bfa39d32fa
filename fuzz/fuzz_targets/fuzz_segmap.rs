//! Fuzz testing for segment map decoding.
//!
//! Any byte string must either decode to a segment map that re-encodes to
//! the same bytes, or be rejected with an error.

#![no_main]

use libfuzzer_sys::fuzz_target;

use semicore::vector::{decode_segmap, encode_segmap};

fuzz_target!(|data: &[u8]| {
    if let Ok(segmap) = decode_segmap(data) {
        let encoded = encode_segmap(&segmap).expect("decoded segmap re-encodes");
        assert_eq!(encoded.as_slice(), data);
    }
});
