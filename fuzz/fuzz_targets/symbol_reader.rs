#![no_main]

use keylag::capture::StreamCapture;
use keylag::clock::ScriptedClock;
use keylag::input::SymbolReader;
use keylag::rank::rank;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must either capture cleanly or fail with an error,
    // never panic
    let clock = ScriptedClock::from_millis(&[0, 3, 5, 11, 20]);
    let source = SymbolReader::new(Cursor::new(data.to_vec()));
    if let Ok(ledger) = StreamCapture::new(&clock, source).capture_pairs() {
        let _ = rank(&ledger);
    }
});
