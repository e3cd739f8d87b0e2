// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! `foreman init`: scaffold a starter config and agent prompt files.

use crate::exit_error::ExitError;
use serde_json::json;
use std::path::Path;

pub const CONFIG_FILE: &str = "foreman.config.json";

const AGENT_PROMPTS: &[(&str, &str)] = &[
    (
        "planner.md",
        "# Planner Agent\n\nBreak the task into reviewable subtasks and set up their dependencies.\n",
    ),
    (
        "coder.md",
        "# Coder Agent\n\nImplement the task in its worktree, commit, and move it forward when done.\n",
    ),
    (
        "reviewer.md",
        "# Reviewer Agent\n\nReview the branch against the task description; comment and move or bounce it.\n",
    ),
];

/// Write the starter layout into `dir`. Existing files are left alone.
pub fn run(dir: &Path) -> Result<(), ExitError> {
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() {
        println!("Config already exists: {}", config_path.display());
    } else {
        let config = json!({
            "repo_path": dir.display().to_string(),
            "base_branch": "main",
            "worktrees_path": "~/.foreman/worktrees",
            "db_path": "~/.foreman/foreman.db",
            "max_parallel_agents": 3,
            "port_range": [4000, 4099],
            "default_model": fm_core::DEFAULT_MODEL,
        });
        std::fs::write(
            &config_path,
            format!("{}\n", serde_json::to_string_pretty(&config).unwrap_or_default()),
        )?;
        println!("Created {}", config_path.display());
    }

    let agents_dir = dir.join("agents");
    std::fs::create_dir_all(&agents_dir)?;
    for (filename, body) in AGENT_PROMPTS {
        let dest = agents_dir.join(filename);
        if dest.exists() {
            println!("  Agent prompt already exists: {}", dest.display());
            continue;
        }
        std::fs::write(&dest, body)?;
        println!("  Created {}", dest.display());
    }

    println!("Done. Edit {CONFIG_FILE} to set your repo_path.");
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
