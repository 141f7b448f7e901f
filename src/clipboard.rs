//! System clipboard access through the platform's copy utility.

use std::io::Write;
use std::process::{Command, Stdio};

/// Program and arguments used to write the clipboard on this platform.
pub fn clipboard_command() -> Option<(&'static str, &'static [&'static str])> {
    if cfg!(target_os = "macos") {
        Some(("pbcopy", &[]))
    } else if cfg!(target_os = "windows") {
        Some(("clip", &[]))
    } else if cfg!(unix) {
        Some(("xclip", &["-selection", "clipboard"]))
    } else {
        None
    }
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> std::io::Result<bool> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }

    Ok(child.wait()?.success())
}

/// Copy `text` to the clipboard. Returns whether the copy utility succeeded.
pub fn copy_to_clipboard(text: &str) -> bool {
    let Some((program, args)) = clipboard_command() else {
        tracing::warn!("no clipboard utility for this platform");
        return false;
    };

    match pipe_to(program, args, text) {
        Ok(true) => {
            tracing::debug!(program, bytes = text.len(), "copied to clipboard");
            true
        }
        Ok(false) => {
            tracing::warn!(program, "clipboard utility exited with failure");
            false
        }
        Err(e) => {
            tracing::warn!(program, error = %e, "clipboard utility unavailable");
            false
        }
    }
}
