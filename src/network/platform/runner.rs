//! External tool execution behind an injectable trait.

use std::io;
use std::process::Command;

/// Captured result of one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Whether the process exited with status 0.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
}

impl ToolOutput {
    /// Returns stderr if non-empty, otherwise stdout, trimmed.
    ///
    /// `netsh` reports failures on stdout; `nmcli` on stderr.
    #[must_use]
    pub fn message(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

/// Runs an external program to completion.
///
/// Implemented by [`SystemRunner`] for real use and by scripted runners in
/// tests.
pub trait ToolRunner {
    /// Runs `program` with `args` and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the process cannot be spawned.
    fn run(&self, program: &str, args: &[String]) -> io::Result<ToolOutput>;
}

/// Runs tools as child processes of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ToolOutput> {
        tracing::debug!("Running {program} {}", args.join(" "));

        let mut command = Command::new(program);
        command.args(args);
        hide_console_window(&mut command);
        let output = command.output()?;

        Ok(ToolOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(windows)]
fn hide_console_window(command: &mut Command) {
    use std::os::windows::process::CommandExt;

    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    command.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
const fn hide_console_window(_command: &mut Command) {}
