//! Fuzz target for markup decoding and highlighting

#![no_main]

use libfuzzer_sys::fuzz_target;
use lip_irc::markup::{decode, encode_archive, encode_wire, plain_text};

fuzz_target!(|input: &str| {
    let runs = decode(input, None);
    assert!(runs.iter().all(|run| !run.text.is_empty()));
    let _ = plain_text(&runs);

    let _ = encode_wire(input);
    let _ = encode_archive(input);
    let _ = lip_irc::highlight(input, ["alice", "bob"]);
});
