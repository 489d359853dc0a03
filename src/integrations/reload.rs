//! Best-effort nudges to running applications after a theme change.
//!
//! Each [`ReloadTask`] is an external command bounded by
//! [`EXTERNAL_COMMAND_TIMEOUT`]. The target application may simply not be
//! running, so every failure (spawn error, non-zero exit, timeout) is logged
//! and reported in the outcome, never propagated.

use crate::generate::Integration;
use crate::preferences::Preferences;
use crate::theme::{HexColor, ThemeMetadata};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// Upper bound for any external command.
pub const EXTERNAL_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// One fire-and-forget action against the outside world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadTask {
    /// Push colours into running kitty windows over remote control.
    Kitty { config: PathBuf },
    /// Recolour the current iTerm2 session through AppleScript.
    Iterm2 { script: String },
    /// Set the desktop picture.
    Wallpaper { image: PathBuf },
    /// Show a desktop notification.
    Notify { title: String, body: String },
    /// Run the user's hook script with the applied slug.
    Hook { script: PathBuf, slug: String },
}

impl ReloadTask {
    /// Short label for logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            ReloadTask::Kitty { .. } => "kitty",
            ReloadTask::Iterm2 { .. } => "iterm2",
            ReloadTask::Wallpaper { .. } => "wallpaper",
            ReloadTask::Notify { .. } => "notification",
            ReloadTask::Hook { .. } => "hook",
        }
    }

    fn needs_macos(&self) -> bool {
        matches!(
            self,
            ReloadTask::Iterm2 { .. } | ReloadTask::Wallpaper { .. } | ReloadTask::Notify { .. }
        )
    }

    fn command(&self) -> Command {
        match self {
            ReloadTask::Kitty { config } => {
                let mut cmd = Command::new("kitty");
                cmd.args(["@", "set-colors", "--all", "--configured"])
                    .arg(config);
                cmd
            }
            ReloadTask::Iterm2 { script } => osascript(script),
            ReloadTask::Wallpaper { image } => osascript(&format!(
                "tell application \"System Events\" to tell every desktop to set picture to \"{}\"",
                applescript_escape(&image.display().to_string())
            )),
            ReloadTask::Notify { title, body } => osascript(&format!(
                "display notification \"{}\" with title \"{}\"",
                applescript_escape(body),
                applescript_escape(title)
            )),
            ReloadTask::Hook { script, slug } => {
                let mut cmd = Command::new(script);
                cmd.arg(slug);
                cmd
            }
        }
    }
}

/// Result of running one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub task: &'static str,
    /// `None` on success.
    pub error: Option<String>,
}

fn osascript(script: &str) -> Command {
    let mut cmd = Command::new("osascript");
    cmd.arg("-e").arg(script);
    cmd
}

fn applescript_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// AppleScript colour literal (16-bit channels).
fn applescript_color(color: HexColor) -> String {
    let (r, g, b) = color.channels();
    format!(
        "{{{}, {}, {}}}",
        u32::from(r) * 257,
        u32::from(g) * 257,
        u32::from(b) * 257
    )
}

/// Script that recolours the front iTerm2 session when iTerm2 is running.
pub fn iterm2_script(theme: &ThemeMetadata) -> String {
    let c = &theme.colors;
    let mut lines = vec![
        format!("set background color to {}", applescript_color(c.background)),
        format!("set foreground color to {}", applescript_color(c.foreground)),
        format!("set cursor color to {}", applescript_color(c.cursor)),
        format!("set selection color to {}", applescript_color(c.selection)),
    ];
    let names = ["black", "red", "green", "yellow", "blue", "magenta", "cyan", "white"];
    for (name, color) in names.iter().zip(c.normal()) {
        lines.push(format!("set ANSI {name} color to {}", applescript_color(color)));
    }
    for (name, color) in names.iter().zip(c.bright()) {
        lines.push(format!(
            "set ANSI bright {name} color to {}",
            applescript_color(color)
        ));
    }
    format!(
        "if application \"iTerm2\" is running then\n\
         tell application \"iTerm2\"\n\
         repeat with w in windows\n\
         repeat with t in tabs of w\n\
         repeat with s in sessions of t\n\
         tell s\n{}\nend tell\n\
         end repeat\nend repeat\nend repeat\n\
         end tell\nend if",
        lines.join("\n")
    )
}

/// Decide which tasks to run after applying `theme` from `dir`.
pub fn plan(
    prefs: &Preferences,
    slug: &str,
    theme: &ThemeMetadata,
    dir: &Path,
    wallpaper: Option<&Path>,
) -> Vec<ReloadTask> {
    let mut tasks = Vec::new();

    if prefs.is_enabled(Integration::Kitty) {
        tasks.push(ReloadTask::Kitty {
            config: dir.join(Integration::Kitty.file_name()),
        });
    }
    if prefs.is_enabled(Integration::Iterm2) {
        tasks.push(ReloadTask::Iterm2 {
            script: iterm2_script(theme),
        });
    }
    if let Some(image) = wallpaper.filter(|_| prefs.wallpaper_enabled()) {
        tasks.push(ReloadTask::Wallpaper {
            image: image.to_path_buf(),
        });
    }
    if prefs.notify_on_change() {
        tasks.push(ReloadTask::Notify {
            title: "Chameleon".to_string(),
            body: format!("Switched to {}", theme.name),
        });
    }
    if let Some(script) = &prefs.hook_script {
        tasks.push(ReloadTask::Hook {
            script: script.clone(),
            slug: slug.to_string(),
        });
    }
    tasks
}

async fn run_one(task: &ReloadTask) -> Result<()> {
    if task.needs_macos() && !cfg!(target_os = "macos") {
        tracing::debug!(task = task.label(), "Skipping macOS-only reload task");
        return Ok(());
    }

    let mut cmd = task.command();
    cmd.stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::piped())
        .kill_on_drop(true);

    let child = cmd
        .spawn()
        .with_context(|| format!("Failed to start {} command", task.label()))?;
    let output = tokio::time::timeout(EXTERNAL_COMMAND_TIMEOUT, child.wait_with_output())
        .await
        .with_context(|| {
            format!(
                "{} command timed out after {}s",
                task.label(),
                EXTERNAL_COMMAND_TIMEOUT.as_secs()
            )
        })?
        .with_context(|| format!("Failed to wait for {} command", task.label()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "{} command exited with {}: {}",
            task.label(),
            output.status,
            stderr.trim()
        );
    }
    Ok(())
}

/// Run every task, each in its own error boundary.
pub async fn run_all(tasks: &[ReloadTask]) -> Vec<TaskOutcome> {
    let mut outcomes = Vec::with_capacity(tasks.len());
    for task in tasks {
        let error = match run_one(task).await {
            Ok(()) => {
                tracing::debug!(task = task.label(), "Reload task finished");
                None
            }
            Err(e) => {
                tracing::warn!(task = task.label(), error = %format!("{e:#}"), "Reload task failed");
                Some(format!("{e:#}"))
            }
        };
        outcomes.push(TaskOutcome {
            task: task.label(),
            error,
        });
    }
    outcomes
}
