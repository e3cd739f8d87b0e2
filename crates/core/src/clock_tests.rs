// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

use super::*;

#[test]
fn system_clock_formats_rfc3339_utc() {
    let ts = SystemClock.timestamp();
    assert!(ts.ends_with('Z'), "expected UTC suffix: {ts}");
    assert!(DateTime::parse_from_rfc3339(&ts).is_ok());
}

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new();
    let before = clock.timestamp();
    clock.advance(chrono::Duration::seconds(42));
    let after = clock.timestamp();
    assert!(after > before);
    assert_eq!(clock.epoch_secs() - 42, FakeClock::new().epoch_secs());
}

#[test]
fn timestamps_sort_lexicographically() {
    let clock = FakeClock::new();
    let mut stamps = Vec::new();
    for _ in 0..5 {
        stamps.push(clock.timestamp());
        clock.advance(chrono::Duration::microseconds(1));
    }
    let mut sorted = stamps.clone();
    sorted.sort();
    assert_eq!(stamps, sorted);
}
