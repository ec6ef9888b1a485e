//! Fuzz target for line framing and dispatch
//!
//! Splits the input into chunks at arbitrary points and feeds them to a
//! ready session. Faults may close the session but must never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lip_irc::{MemoryDisplay, NullArchive, Session, SessionConfig};

fuzz_target!(|data: &[u8]| {
    let Some((&split, stream)) = data.split_first() else {
        return;
    };
    let chunk = usize::from(split).max(1);

    let mut session = Session::new(SessionConfig::new("me"), MemoryDisplay::default(), NullArchive);
    session.connected();
    for part in stream.chunks(chunk) {
        if session.feed(part).is_err() {
            assert!(session.is_closed());
            break;
        }
    }
});
