#![no_main]

use libfuzzer_sys::fuzz_target;
use marcdiff::{Decoder, RecoveryMode};

fuzz_target!(|data: &[u8]| {
    let lenient = marcdiff::decode(data);
    let strict = Decoder::new()
        .with_recovery_mode(RecoveryMode::Strict)
        .decode_all(data);

    // Strict decoding either fails or agrees with lenient decoding.
    if let Ok(records) = strict {
        assert_eq!(records, lenient);
    }
    for record in &lenient {
        let _ = marcdiff::title_of(record);
    }
});
