//! Fuzz target for feature file parsing.
//!
//! Malformed JSON, TOML and env content must be rejected with an error,
//! never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;

use rollgate_config::{FeatureFileLoader, FileFormat};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        for format in [FileFormat::Json, FileFormat::Toml, FileFormat::Env] {
            let _ = FeatureFileLoader::new(format).parse(content);
        }
    }
});
