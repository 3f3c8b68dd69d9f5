#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // We are only interested in panics or worse crashes, so the result is
    // ignored. It's fine if the reader says "this is not a valid PLY file".
    let _ = plycloud::ply::read(data);
});
