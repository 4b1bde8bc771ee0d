#![no_main]

use ed2k_wire::Searcher;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Deeply nested operator chains must not blow the stack.
    if let Ok(expr) = Searcher::decode(data) {
        let _ = expr.encode();
    }
});
