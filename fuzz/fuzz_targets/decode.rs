#![no_main]

use bclyt::Layout;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(encoded) = Layout::decode(data).and_then(|layout| layout.encode()) else {
        return;
    };
    // compared as bytes, decoded floats may be NaN
    let reencoded = Layout::decode(&encoded).and_then(|layout| layout.encode());
    assert_eq!(reencoded.ok().as_deref(), Some(encoded.as_slice()));
});
