#![no_main]

use ed2k_wire::Tag;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz tag deserialization - test for panics, crashes, infinite loops
    if let Ok(tag) = Tag::decode(data) {
        // Anything that decodes must re-encode without panicking.
        let _ = tag.encode();
    }
});
