#![no_main]

use libfuzzer_sys::fuzz_target;
use plycloud::ply::{self, Config};

fuzz_target!(|data: &[u8]| {
    let cloud = match ply::read(data) {
        Ok(cloud) => cloud,
        Err(_) => return,
    };

    // Everything we could read, we have to be able to write and read again
    // without any change. Compare the written bytes, as positions may be NaN.
    let config = Config::binary();
    let first = config.write_to_memory(&cloud).expect("writing to memory failed");
    let reread = ply::read(&*first).expect("reading own output failed");
    let second = config.write_to_memory(&reread).expect("writing to memory failed");
    assert_eq!(first, second);
});
