//! Generator invoker that runs real child processes.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tracing::{debug, warn};

use crate::command::{
    ports::{
        GeneratorExit, GeneratorInvoker, GeneratorLines, GeneratorReadError, GeneratorRequest,
        LaunchError,
    },
    services::DispatcherConfig,
};

const DEFAULT_TERMINATION_GRACE: Duration = Duration::from_millis(500);
const DEFAULT_MAX_LINE_BYTES: usize = 64 * 1024;

/// Launches generators as child processes and streams their stdout.
///
/// Stdin is closed and stderr discarded. Children are killed on drop, and
/// [`GeneratorLines::close`] reaps them: a child that already reached end
/// of output is given the termination grace period to exit; otherwise it
/// receives `SIGTERM` (on unix), then `SIGKILL` once the grace period
/// elapses.
///
/// Output lines longer than the line cap (64 KiB by default) are split
/// into chunks of at most that many bytes.
#[derive(Debug, Clone, Copy)]
pub struct ProcessGeneratorInvoker {
    termination_grace: Duration,
    max_line_bytes: usize,
}

impl ProcessGeneratorInvoker {
    /// Creates an invoker with a 500 ms termination grace period.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            termination_grace: DEFAULT_TERMINATION_GRACE,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }

    /// Creates an invoker using the termination grace of `config`.
    ///
    /// The generator timeout in `config` is enforced by the dispatcher,
    /// not the invoker.
    #[must_use]
    pub const fn from_config(config: &DispatcherConfig) -> Self {
        Self::new().with_termination_grace(config.termination_grace)
    }

    /// Sets how long a child may take to exit before it is killed.
    #[must_use]
    pub const fn with_termination_grace(mut self, grace: Duration) -> Self {
        self.termination_grace = grace;
        self
    }

    /// Sets the longest line, in bytes, returned in one piece. Zero is
    /// treated as one byte.
    #[must_use]
    pub const fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = if max_line_bytes == 0 { 1 } else { max_line_bytes };
        self
    }

    /// Returns the termination grace period.
    #[must_use]
    pub const fn termination_grace(&self) -> Duration {
        self.termination_grace
    }

    /// Returns the line cap in bytes.
    #[must_use]
    pub const fn max_line_bytes(&self) -> usize {
        self.max_line_bytes
    }
}

impl Default for ProcessGeneratorInvoker {
    fn default() -> Self {
        Self::new()
    }
}

fn launch_error(program: &Utf8Path, error: &io::Error) -> LaunchError {
    let program = program.to_owned();
    match error.kind() {
        io::ErrorKind::NotFound => LaunchError::NotFound { program },
        io::ErrorKind::PermissionDenied => LaunchError::PermissionDenied { program },
        _ => LaunchError::Spawn {
            program,
            reason: error.to_string(),
        },
    }
}

#[async_trait]
impl GeneratorInvoker for ProcessGeneratorInvoker {
    async fn launch(
        &self,
        request: &GeneratorRequest,
    ) -> Result<Box<dyn GeneratorLines>, LaunchError> {
        let mut child = Command::new(request.program().as_std_path())
            .args(request.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|error| launch_error(request.program(), &error))?;

        let Some(stdout) = child.stdout.take() else {
            if let Err(error) = child.kill().await {
                warn!(program = %request.program(), %error, "failed to reap generator");
            }
            return Err(LaunchError::Spawn {
                program: request.program().to_owned(),
                reason: "standard output was not captured".to_owned(),
            });
        };

        debug!(
            program = %request.program(),
            pid = ?child.id(),
            args = ?request.args(),
            "generator launched"
        );
        Ok(Box::new(ProcessLines {
            program: request.program().to_owned(),
            child,
            reader: BufReader::new(stdout),
            termination_grace: self.termination_grace,
            max_line_bytes: self.max_line_bytes,
            finished: false,
            exit: None,
        }))
    }
}

struct ProcessLines {
    program: Utf8PathBuf,
    child: Child,
    reader: BufReader<ChildStdout>,
    termination_grace: Duration,
    max_line_bytes: usize,
    finished: bool,
    exit: Option<GeneratorExit>,
}

impl ProcessLines {
    async fn wait_within_grace(&mut self) -> Option<GeneratorExit> {
        match tokio::time::timeout(self.termination_grace, self.child.wait()).await {
            Ok(Ok(status)) => Some(GeneratorExit::exited(status.code())),
            Ok(Err(error)) => {
                warn!(program = %self.program, %error, "failed to wait for generator");
                None
            }
            Err(_) => None,
        }
    }

    async fn terminate(&mut self) -> GeneratorExit {
        if let Some(exit) = self.request_exit().await {
            return GeneratorExit::terminated(exit.code);
        }
        if let Err(error) = self.child.kill().await {
            warn!(program = %self.program, %error, "failed to kill generator");
        }
        let code = self
            .child
            .try_wait()
            .ok()
            .flatten()
            .and_then(|status| status.code());
        GeneratorExit::terminated(code)
    }

    #[cfg(unix)]
    async fn request_exit(&mut self) -> Option<GeneratorExit> {
        let pid = self.child.id()?;
        if let Err(error) = send_sigterm(pid) {
            debug!(program = %self.program, pid, %error, "SIGTERM not delivered");
        }
        let exit = self.wait_within_grace().await;
        if exit.is_none() {
            warn!(program = %self.program, pid, "generator ignored SIGTERM, killing");
        }
        exit
    }

    #[cfg(not(unix))]
    async fn request_exit(&mut self) -> Option<GeneratorExit> {
        None
    }
}

#[cfg(unix)]
fn send_sigterm(pid: u32) -> nix::Result<()> {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let raw = i32::try_from(pid).map_err(|_| nix::errno::Errno::ESRCH)?;
    kill(Pid::from_raw(raw), Signal::SIGTERM)
}

#[async_trait]
impl GeneratorLines for ProcessLines {
    async fn next_line(&mut self) -> Result<Option<String>, GeneratorReadError> {
        if self.finished {
            return Ok(None);
        }
        let mut buffer = Vec::new();
        let limit = u64::try_from(self.max_line_bytes).unwrap_or(u64::MAX);
        let read = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut buffer)
            .await
            .map_err(|error| GeneratorReadError::Io(error.to_string()))?;
        if read == 0 {
            self.finished = true;
            return Ok(None);
        }
        if buffer.last() == Some(&b'\n') {
            buffer.pop();
            if buffer.last() == Some(&b'\r') {
                buffer.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
    }

    async fn close(&mut self) -> GeneratorExit {
        if let Some(exit) = self.exit {
            return exit;
        }
        let exit = if self.finished {
            match self.wait_within_grace().await {
                Some(exit) => exit,
                None => self.terminate().await,
            }
        } else {
            self.terminate().await
        };
        debug!(
            program = %self.program,
            code = ?exit.code,
            terminated = exit.terminated,
            "generator reaped"
        );
        self.exit = Some(exit);
        exit
    }
}
