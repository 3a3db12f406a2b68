//! Fuzzing harness for the INI parser
//!
//! Arbitrary input must never panic, only return syntax errors.
//! Run with: cargo fuzz run ini_parser

#![no_main]
use fastanime_config::ini::IniDocument;
use fastanime_config::Settings;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(doc) = IniDocument::parse(s) {
            let _ = Settings::from_document(&doc);
            let _ = IniDocument::parse(&doc.to_string());
        }
    }
});
