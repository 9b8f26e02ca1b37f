#![no_main]

use libfuzzer_sys::fuzz_target;
use treewatch::{ChangeEvent, EventFilter, PatternSet};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // First line is the pattern, the rest is a path to test against it
        let (pattern, path) = content.split_once('\n').unwrap_or((content, ""));

        if let Ok(set) = PatternSet::new([pattern]) {
            let _ = set.matches(path);
            let filter = EventFilter::new(set.clone(), set);
            let _ = filter.accept(&ChangeEvent::write(path));
        }
    }
});
