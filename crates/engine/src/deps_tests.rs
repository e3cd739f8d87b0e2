// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

use super::*;
use crate::test_support::Fixture;

#[tokio::test]
async fn cycle_detection_follows_chains() {
    let mut fx = Fixture::new().await;
    let a = fx.task_at("a", "Plan");
    let b = fx.task_at("b", "Plan");
    let c = fx.task_at("c", "Plan");
    let d = fx.task_at("d", "Plan");
    fx.surface.add_dependency(&a.id, &b.id).unwrap();
    fx.surface.add_dependency(&b.id, &c.id).unwrap();
    fx.surface.add_dependency(&c.id, &d.id).unwrap();

    let conn = fx.surface.db().conn();
    assert!(would_create_cycle(conn, &d.id, &a.id).unwrap());
    assert!(would_create_cycle(conn, &c.id, &a.id).unwrap());
    assert!(would_create_cycle(conn, &b.id, &b.id).unwrap());
    // A parallel edge in the same direction is not a cycle.
    assert!(!would_create_cycle(conn, &a.id, &c.id).unwrap());
    assert!(!would_create_cycle(conn, &a.id, &d.id).unwrap());
}

#[tokio::test]
async fn blocked_until_every_predecessor_is_terminal() {
    let mut fx = Fixture::new().await;
    let a = fx.task_at("a", "Plan");
    let b = fx.task_at("b", "Plan");
    let c = fx.task_at("c", "Plan");
    fx.surface.add_dependency(&a.id, &c.id).unwrap();
    fx.surface.add_dependency(&b.id, &c.id).unwrap();

    assert!(is_blocked(fx.surface.db().conn(), &c.id).unwrap());

    fx.surface.complete_task(&a.id).unwrap();
    assert!(is_blocked(fx.surface.db().conn(), &c.id).unwrap());

    fx.surface.complete_task(&b.id).unwrap();
    assert!(!is_blocked(fx.surface.db().conn(), &c.id).unwrap());
}

#[tokio::test]
async fn parent_approval_gate() {
    let mut fx = Fixture::new().await;
    let (milestone, children) = fx.milestone_with_children("m", "Plan", &["c"]);
    let child = fx.reload(&children[0].id);
    assert!(!is_parent_approved(fx.surface.db().conn(), &child).unwrap());

    fx.surface.approve_plan(&milestone.id).unwrap();
    let child = fx.reload(&children[0].id);
    assert!(is_parent_approved(fx.surface.db().conn(), &child).unwrap());

    // Orphans and children of plain tasks always pass.
    let plain_parent = fx.task_at("plain", "Plan");
    let mut adopted = fx.task_at("adopted", "Plan");
    adopted.parent_task_id = Some(plain_parent.id.clone());
    assert!(is_parent_approved(fx.surface.db().conn(), &adopted).unwrap());
}

#[tokio::test]
async fn ready_successors_applies_every_gate() {
    let mut fx = Fixture::new().await;
    let done = fx.task_at("done", "Plan");
    let free = fx.task_at("free", "Plan");
    let chained = fx.task_at("chained", "Plan");
    let other_pred = fx.task_at("other-pred", "Plan");
    let cancelled = fx.task_at("cancelled", "Plan");

    fx.surface.add_dependency(&done.id, &free.id).unwrap();
    fx.surface.add_dependency(&done.id, &chained.id).unwrap();
    fx.surface.add_dependency(&other_pred.id, &chained.id).unwrap();
    fx.surface.add_dependency(&done.id, &cancelled.id).unwrap();
    fx.surface.cancel_task(&cancelled.id).unwrap();

    fx.surface.complete_task(&done.id).unwrap();
    let ready = ready_successors(fx.surface.db().conn(), &done.id).unwrap();
    let titles: Vec<&str> = ready.iter().map(|t| t.title.as_str()).collect();
    // `chained` still waits on other-pred, `cancelled` is out.
    assert_eq!(titles, vec!["free"]);
}

#[tokio::test]
async fn dispatch_gate_counts_capacity() {
    let mut fx = Fixture::new().await;
    let a = fx.task_at("a", "Plan");
    let task = fx.reload(&a.id);

    let gate = dispatch_gate(fx.surface.db().conn(), &task, 1).unwrap();
    assert!(!gate.has_active_run);
    assert!(!gate.at_capacity);

    // An open run on another task saturates a capacity of one.
    let b = fx.task_at("b", "Plan");
    fm_store::runs::insert(
        fx.surface.db().conn(),
        &fm_core::AgentRun {
            id: fm_core::RunId::new(),
            task_id: b.id.clone(),
            step_id: fx.step_id("Plan"),
            started_at: "2026-01-01T00:00:00Z".to_string(),
            completed_at: None,
            exit_code: None,
            error: None,
        },
    )
    .unwrap();

    let gate = dispatch_gate(fx.surface.db().conn(), &task, 1).unwrap();
    assert!(!gate.has_active_run);
    assert!(gate.at_capacity);

    let gate = dispatch_gate(fx.surface.db().conn(), &task, 2).unwrap();
    assert!(!gate.at_capacity);
}
