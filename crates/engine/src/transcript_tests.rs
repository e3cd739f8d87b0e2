// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

use super::*;
use fm_core::{ProjectId, StepId, TaskId, TaskType};
use tempfile::TempDir;

fn task(session: Option<&str>, worktree: Option<&Path>) -> Task {
    Task {
        id: TaskId::from_string("t"),
        project_id: ProjectId::from_string("p"),
        parent_task_id: None,
        title: "t".to_string(),
        description: String::new(),
        step_id: StepId::from_string("s"),
        cancelled: false,
        task_type: TaskType::Task,
        plan_approved: false,
        output: None,
        worktree_path: worktree.map(|p| p.to_path_buf()),
        branch: None,
        session_id: session.map(str::to_string),
        created_at: "2026-01-01T00:00:00Z".to_string(),
        updated_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

fn write_transcript(base: &Path, worktree: &Path, session: &str, body: &str) {
    let path = transcript_path(base, worktree, session);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

#[test]
fn encodes_worktree_path_with_dashes() {
    assert_eq!(
        project_dir_name(Path::new("/wt/proj/task")),
        "wt-proj-task"
    );
    assert_eq!(project_dir_name(Path::new("relative/dir")), "relative-dir");
    // Dots encode the same way separators do.
    assert_eq!(
        project_dir_name(Path::new("/work/my.repo/t1")),
        "work-my-repo-t1"
    );
}

#[test]
fn dotted_worktree_paths_resolve_their_transcript() {
    let base = TempDir::new().unwrap();
    // The agent CLI writes under the dashed name; pin that location by hand
    // so the reader's encoding is checked against it, not against itself.
    let log_dir = base.path().join("projects").join("work-my-repo-t1");
    std::fs::create_dir_all(&log_dir).unwrap();
    std::fs::write(
        log_dir.join("sess.jsonl"),
        "{\"type\":\"assistant\",\"message\":{}}\n",
    )
    .unwrap();

    let t = task(Some("sess"), Some(Path::new("/work/my.repo/t1")));
    let page = read_transcript(base.path(), &t, false, 0);
    assert_eq!(page.status, TranscriptStatus::Completed);
    assert_eq!(page.lines.len(), 1);
}

#[test]
fn transcript_path_layout() {
    let path = transcript_path(Path::new("/home/u/.claude"), Path::new("/wt/p/t"), "sess-1");
    assert_eq!(
        path,
        Path::new("/home/u/.claude/projects/wt-p-t/sess-1.jsonl")
    );
}

#[yare::parameterized(
    no_session  = { None, true, TranscriptStatus::NoSession },
    no_worktree = { Some("sess"), false, TranscriptStatus::NoWorktree },
)]
fn missing_prerequisites(session: Option<&str>, with_worktree: bool, expected: TranscriptStatus) {
    let base = TempDir::new().unwrap();
    let worktree = TempDir::new().unwrap();
    let t = task(session, with_worktree.then(|| worktree.path()));
    let page = read_transcript(base.path(), &t, false, 0);
    assert_eq!(page.status, expected);
    assert!(page.lines.is_empty());
    assert_eq!(page.new_offset, 0);
}

#[test]
fn missing_file_is_transcript_not_found() {
    let base = TempDir::new().unwrap();
    let worktree = TempDir::new().unwrap();
    let t = task(Some("sess"), Some(worktree.path()));
    let page = read_transcript(base.path(), &t, false, 0);
    assert_eq!(page.status, TranscriptStatus::TranscriptNotFound);
}

#[test]
fn filters_to_meaningful_types_and_pages_by_offset() {
    let base = TempDir::new().unwrap();
    let worktree = TempDir::new().unwrap();
    write_transcript(
        base.path(),
        worktree.path(),
        "sess",
        concat!(
            r#"{"type":"system","subtype":"init","session_id":"sess"}"#,
            "\n",
            r#"{"type":"progress","tick":1}"#,
            "\n",
            r#"{"type":"assistant","message":{"content":[]}}"#,
            "\n",
            "not json\n",
            r#"{"type":"result","subtype":"success"}"#,
            "\n",
        ),
    );
    let t = task(Some("sess"), Some(worktree.path()));

    let page = read_transcript(base.path(), &t, true, 0);
    assert_eq!(page.status, TranscriptStatus::Running);
    assert_eq!(page.lines.len(), 3);
    assert_eq!(page.lines[0]["type"], "system");
    assert_eq!(page.lines[1]["type"], "assistant");
    assert_eq!(page.lines[2]["type"], "result");
    assert_eq!(page.new_offset, 5);

    // Tail from the returned offset: nothing new yet.
    let tail = read_transcript(base.path(), &t, false, page.new_offset);
    assert_eq!(tail.status, TranscriptStatus::Completed);
    assert!(tail.lines.is_empty());
    assert_eq!(tail.new_offset, 5);

    // New lines appear after the offset.
    let path = transcript_path(base.path(), worktree.path(), "sess");
    let mut body = std::fs::read_to_string(&path).unwrap();
    body.push_str("{\"type\":\"user\",\"message\":{}}\n");
    std::fs::write(&path, body).unwrap();

    let tail = read_transcript(base.path(), &t, false, page.new_offset);
    assert_eq!(tail.lines.len(), 1);
    assert_eq!(tail.lines[0]["type"], "user");
    assert_eq!(tail.new_offset, 6);
}

#[tokio::test]
async fn store_aware_read_resolves_the_task() {
    let mut fx = crate::test_support::Fixture::new().await;
    let base = TempDir::new().unwrap();
    let worktree = TempDir::new().unwrap();

    let created = fx.task_at("t", "Plan");
    assert!(matches!(
        read_for_task(fx.surface.db(), base.path(), &created.id, 0)
            .unwrap()
            .unwrap()
            .status,
        TranscriptStatus::NoSession
    ));

    fm_store::tasks::set_worktree(
        fx.surface.db().conn(),
        &created.id,
        worktree.path(),
        "task-x",
        "2026-01-01T00:00:01Z",
    )
    .unwrap();
    fm_store::tasks::set_session(
        fx.surface.db().conn(),
        &created.id,
        "sess",
        "2026-01-01T00:00:01Z",
    )
    .unwrap();
    write_transcript(
        base.path(),
        worktree.path(),
        "sess",
        "{\"type\":\"assistant\",\"message\":{}}\n",
    );

    let page = read_for_task(fx.surface.db(), base.path(), &created.id, 0)
        .unwrap()
        .unwrap();
    // No active run rows: the transcript reads as completed.
    assert_eq!(page.status, TranscriptStatus::Completed);
    assert_eq!(page.lines.len(), 1);

    assert!(read_for_task(fx.surface.db(), base.path(), &TaskId::from_string("nope"), 0)
        .unwrap()
        .is_none());
}

#[test]
fn running_status_tracks_active_run() {
    let base = TempDir::new().unwrap();
    let worktree = TempDir::new().unwrap();
    write_transcript(base.path(), worktree.path(), "sess", "");
    let t = task(Some("sess"), Some(worktree.path()));

    assert_eq!(
        read_transcript(base.path(), &t, true, 0).status,
        TranscriptStatus::Running
    );
    assert_eq!(
        read_transcript(base.path(), &t, false, 0).status,
        TranscriptStatus::Completed
    );
}
