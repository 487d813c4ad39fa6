//! Clipboard sink for accepted blocking rules.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow, bail};

#[cfg(target_os = "macos")]
const SHELL_COPIERS: &[&[&str]] = &[&["pbcopy"]];

#[cfg(all(unix, not(target_os = "macos")))]
const SHELL_COPIERS: &[&[&str]] = &[&["wl-copy"], &["xclip", "-selection", "clipboard"]];

#[cfg(target_os = "windows")]
const SHELL_COPIERS: &[&[&str]] = &[&["powershell.exe", "-NoProfile", "-Command", "Set-Clipboard"]];

#[cfg(not(any(unix, target_os = "windows")))]
const SHELL_COPIERS: &[&[&str]] = &[];

/// Copies rule text to the system clipboard, falling back to shell utilities on headless hosts.
pub struct Clipboard {
    system: Option<arboard::Clipboard>,
}

impl Clipboard {
    pub fn new() -> Self {
        let system = arboard::Clipboard::new()
            .map_err(|err| tracing::debug!(error = %err, "system clipboard unavailable"))
            .ok();
        Self { system }
    }

    /// Copy a single rule. Surrounding whitespace is dropped and empty rules are rejected.
    pub fn copy(&mut self, rule: &str) -> Result<()> {
        let rule = rule.trim();
        if rule.is_empty() {
            bail!("refusing to copy an empty rule");
        }

        if let Some(system) = self.system.as_mut()
            && system.set_text(rule.to_owned()).is_ok()
        {
            tracing::debug!(rule = %rule, "rule copied to system clipboard");
            return Ok(());
        }
        self.system = None;

        for command in SHELL_COPIERS {
            match pipe_into(command, rule) {
                Ok(()) => {
                    tracing::debug!(rule = %rule, program = command[0], "rule copied via shell");
                    return Ok(());
                }
                Err(err) => tracing::trace!(error = %err, "clipboard command failed"),
            }
        }
        Err(anyhow!("no clipboard backend accepted the rule"))
    }
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new()
    }
}

fn pipe_into(command: &[&str], text: &str) -> Result<()> {
    let (program, args) = command
        .split_first()
        .context("clipboard command missing program")?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .context("failed to write rule to clipboard command")?;
    }

    let status = child
        .wait()
        .with_context(|| format!("{program} did not exit cleanly"))?;
    if !status.success() {
        bail!("{program} exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rules_are_rejected() {
        let mut clipboard = Clipboard { system: None };
        let err = clipboard.copy("   ").unwrap_err();
        assert!(err.to_string().contains("empty rule"));
    }

    #[test]
    fn missing_program_is_an_error() {
        assert!(pipe_into(&["pickscope-no-such-clipboard"], "rule").is_err());
        assert!(pipe_into(&[], "rule").is_err());
    }
}
