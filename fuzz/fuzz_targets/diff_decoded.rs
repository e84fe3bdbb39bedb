#![no_main]

use libfuzzer_sys::fuzz_target;
use marcdiff::{diff, DiffStatus};

fuzz_target!(|data: &[u8]| {
    let mid = data.len() / 2;
    let left = marcdiff::decode(&data[..mid]);
    let right = marcdiff::decode(&data[mid..]);

    for i in 0..left.len().max(right.len()) {
        let result = diff(left.get(i), right.get(i));
        assert!(result.fields.windows(2).all(|w| w[0].tag() <= w[1].tag()));
        if let (Some(l), Some(r)) = (left.get(i), right.get(i)) {
            if l == r {
                assert!(result.fields.iter().all(|f| f.status == DiffStatus::Unchanged));
            }
        }
    }
});
