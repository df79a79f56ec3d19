#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    dockerfile_parse::fuzz_parse_bytes(data);
});
