#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Config parsing must never panic, including the unknown-key path
        let _ = toml::from_str::<treewatch::Config>(content);

        let dir = std::env::temp_dir().join("treewatch-fuzz");
        if std::fs::create_dir_all(&dir).is_ok() {
            let path = dir.join("treewatch.toml");
            if std::fs::write(&path, content).is_ok() {
                let _ = treewatch::config::load_with_warnings(&path);
            }
        }
    }
});
