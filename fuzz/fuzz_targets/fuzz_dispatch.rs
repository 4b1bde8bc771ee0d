#![no_main]

use ed2k_wire::Dispatcher;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz the frame dispatcher over both entry points.
    let dispatcher = Dispatcher::new();
    let _ = dispatcher.dispatch(data);

    let mut stream = std::io::Cursor::new(data);
    let _ = dispatcher.read_from(&mut stream);
});
