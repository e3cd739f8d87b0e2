// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

use super::*;

#[test]
fn new_ids_are_distinct_uuids() {
    let a = TaskId::new();
    let b = TaskId::new();
    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 36);
    assert_eq!(a.as_str().matches('-').count(), 4);
}

#[test]
fn short_truncates() {
    let id = TaskId::from_string("abcdef01-2345-6789-abcd-ef0123456789");
    assert_eq!(id.short(8), "abcdef01");
    assert_eq!(short("abc", 8), "abc");
}

#[test]
fn serde_is_transparent() {
    let id = ProjectId::from_string("p-1");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"p-1\"");
    let back: ProjectId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn compares_with_str() {
    let id = StepId::from_string("s-1");
    assert_eq!(id, "s-1");
}
