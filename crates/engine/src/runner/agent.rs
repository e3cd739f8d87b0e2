// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Agent CLI subprocess wrapper.
//!
//! Launches the agent with line-framed JSON on stdout, captures the session
//! identifier from the `system/init` handshake line, and reports the exit.
//! The subprocess gets a config file pointing it back at the tool surface
//! (`foreman mcp --task-id <id>`) scoped to the task it is working on.

use super::registry::AgentRegistry;
use crate::error::LaunchError;
use fm_core::{RunId, TaskId};
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

/// Environment variables with this prefix are stripped from the child so a
/// nested agent never believes it is already inside a session.
const NESTING_MARKER_PREFIX: &str = "CLAUDECODE";

/// How much stderr to keep as the recorded error on a failed run.
const STDERR_TAIL_CHARS: usize = 2000;

#[derive(Debug, Clone)]
pub struct AgentInvocation {
    pub run_id: RunId,
    pub task_id: TaskId,
    pub program: String,
    pub model: String,
    pub prompt: String,
    /// Resume this session instead of starting fresh.
    pub resume_session_id: Option<String>,
    pub worktree_path: PathBuf,
    pub db_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentOutput {
    pub session_id: Option<String>,
    pub exit_code: i64,
    pub error: Option<String>,
}

/// Run the agent subprocess to completion.
///
/// `on_session_id` fires as soon as the handshake line is seen, before the
/// run finishes, so the caller can persist the session id immediately.
pub async fn run_agent(
    invocation: AgentInvocation,
    registry: &AgentRegistry,
    mut on_session_id: impl FnMut(&str),
) -> Result<AgentOutput, LaunchError> {
    let backchannel = write_backchannel_config(&invocation)?;
    let args = build_args(&invocation, backchannel.path().display().to_string());

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&args)
        .current_dir(&invocation.worktree_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    for (key, _) in std::env::vars() {
        if key.starts_with(NESTING_MARKER_PREFIX) {
            cmd.env_remove(&key);
        }
    }

    let mut child = cmd.spawn().map_err(|e| LaunchError::Spawn {
        command: invocation.program.clone(),
        message: e.to_string(),
    })?;

    if let Some(pid) = child.id() {
        registry.register(&invocation.run_id, pid);
    }

    // Drain stderr concurrently so a chatty child never blocks on the pipe.
    let stderr_task = child.stderr.take().map(|mut stderr| {
        tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf).await;
            buf
        })
    });

    let mut session_id = invocation.resume_session_id.clone();
    if let Some(stdout) = child.stdout.take() {
        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Ok(message) = serde_json::from_str::<serde_json::Value>(line) else {
                continue;
            };
            if session_id.is_none()
                && message["type"] == "system"
                && message["subtype"] == "init"
            {
                if let Some(sid) = message["session_id"].as_str() {
                    session_id = Some(sid.to_string());
                    on_session_id(sid);
                }
            }
        }
    }

    let status = child.wait().await.map_err(|e| LaunchError::Spawn {
        command: invocation.program.clone(),
        message: e.to_string(),
    });
    registry.deregister(&invocation.run_id);
    let status = status?;

    let stderr_output = match stderr_task {
        Some(handle) => handle.await.unwrap_or_default(),
        None => String::new(),
    };

    let exit_code = i64::from(status.code().unwrap_or(-1));
    let error = if exit_code != 0 && !stderr_output.trim().is_empty() {
        Some(tail(stderr_output.trim(), STDERR_TAIL_CHARS))
    } else {
        None
    };

    Ok(AgentOutput {
        session_id,
        exit_code,
        error,
    })
}

/// Build the agent CLI argument list.
pub(crate) fn build_args(invocation: &AgentInvocation, backchannel_path: String) -> Vec<String> {
    let mut args = vec![
        "--dangerously-skip-permissions".to_string(),
        "--output-format".to_string(),
        "stream-json".to_string(),
        "--verbose".to_string(),
        "--model".to_string(),
        invocation.model.clone(),
        "--mcp-config".to_string(),
        backchannel_path,
    ];
    if let Some(session_id) = &invocation.resume_session_id {
        args.push("--resume".to_string());
        args.push(session_id.clone());
    }
    args.push("-p".to_string());
    args.push(invocation.prompt.clone());
    args
}

/// Write the temp config handing the subprocess back-channel access to the
/// tool surface, scoped to this task. Deleted when the handle drops.
fn write_backchannel_config(
    invocation: &AgentInvocation,
) -> Result<tempfile::NamedTempFile, LaunchError> {
    let config = json!({
        "mcpServers": {
            "foreman": {
                "command": "foreman",
                "args": ["mcp", "--task-id", invocation.task_id.as_str()],
                "env": { "FOREMAN_DB": invocation.db_path.display().to_string() }
            }
        }
    });
    let mut file = tempfile::Builder::new()
        .prefix("foreman-mcp-")
        .suffix(".json")
        .tempfile()
        .map_err(|e| LaunchError::BackchannelConfig(e.to_string()))?;
    file.write_all(config.to_string().as_bytes())
        .map_err(|e| LaunchError::BackchannelConfig(e.to_string()))?;
    file.flush()
        .map_err(|e| LaunchError::BackchannelConfig(e.to_string()))?;
    Ok(file)
}

fn tail(s: &str, max_chars: usize) -> String {
    let count = s.chars().count();
    if count <= max_chars {
        return s.to_string();
    }
    s.chars().skip(count - max_chars).collect()
}

#[cfg(test)]
#[path = "agent_tests.rs"]
pub(crate) mod tests;
