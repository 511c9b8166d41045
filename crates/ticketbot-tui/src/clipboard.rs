use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

/// External command that takes copied text on stdin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clipboard {
    program: String,
    args: Vec<String>,
}

impl Default for Clipboard {
    fn default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("pbcopy", &[])
        } else {
            Self::new("xclip", &["-selection", "clipboard"])
        }
    }
}

impl Clipboard {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn copy(&self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.program))?;

        // stdin is dropped at the end of this expression so the tool sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };

        // Always reap the child, even when the write failed
        let status = child
            .wait()
            .with_context(|| format!("Failed to wait for {}", self.program))?;
        written.with_context(|| format!("Failed to write to {}", self.program))?;

        if !status.success() {
            bail!("{} exited with {}", self.program, status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_is_an_error() {
        let clipboard = Clipboard::new("ticketbot-no-such-clipboard-tool", &[]);
        let err = clipboard.copy("₹985").unwrap_err();
        assert!(err.to_string().contains("Failed to start"));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_tool() {
        assert!(Clipboard::new("cat", &[]).copy("Shatabdi Express").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_tool_is_an_error() {
        assert!(Clipboard::new("false", &[]).copy("").is_err());
    }
}
