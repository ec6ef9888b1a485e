//! Fuzz target for IRC message parsing
//!
//! Feeds arbitrary lines to the parser and checks that accepted lines
//! survive a serialize-and-reparse cycle.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str;

fuzz_target!(|data: &[u8]| {
    // Only fuzz valid UTF-8 strings to focus on protocol-level issues
    if let Ok(input) = str::from_utf8(data) {
        if input.is_empty() || input.len() > 512 {
            return;
        }

        if let Ok(msg) = input.parse::<lip_irc::Message>() {
            let reparsed: lip_irc::Message = msg
                .to_string()
                .parse()
                .expect("serialized message should parse");
            assert_eq!(msg, reparsed);

            // Handler-side prefix parsing should never panic
            let _ = msg.source();
        }

        // Outbound sanitization should never panic
        let _ = lip_irc::IrcCodec::new().sanitize(input.to_string());
    }
});
