#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let _ = docpack::unpack::<docpack::Value>(data);
});
