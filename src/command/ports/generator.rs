//! External generator port.
//!
//! A generator is a line-oriented program launched once per command
//! execution. Launch failure is an expected, recoverable outcome and is
//! reported separately from empty output.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// A concrete program invocation with rendered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorRequest {
    program: Utf8PathBuf,
    args: Vec<String>,
}

impl GeneratorRequest {
    /// Creates a request for `program` without arguments.
    #[must_use]
    pub fn new(program: impl Into<Utf8PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Replaces the program arguments.
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the program path.
    #[must_use]
    pub fn program(&self) -> &Utf8Path {
        &self.program
    }

    /// Returns the program arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Launches generator programs.
#[async_trait]
pub trait GeneratorInvoker: Send + Sync {
    /// Starts the program and returns its output as a lazy line sequence.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError`] when the program cannot be found or started.
    async fn launch(&self, request: &GeneratorRequest)
    -> Result<Box<dyn GeneratorLines>, LaunchError>;
}

/// Lazy, finite, non-restartable sequence of output lines.
///
/// Callers must call [`GeneratorLines::close`] on every exit path so that
/// the underlying process is terminated if needed and reaped.
#[async_trait]
pub trait GeneratorLines: Send {
    /// Reads the next line without its terminator; `None` at end of stream.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorReadError`] when reading the stream fails.
    async fn next_line(&mut self) -> Result<Option<String>, GeneratorReadError>;

    /// Releases the generator: terminates it if still running, then reaps
    /// it. Calling `close` again returns the recorded exit.
    async fn close(&mut self) -> GeneratorExit;
}

/// How a generator ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorExit {
    /// Exit code, when the platform reports one.
    pub code: Option<i32>,
    /// Whether the generator had to be terminated.
    pub terminated: bool,
}

impl GeneratorExit {
    /// The generator exited by itself.
    #[must_use]
    pub const fn exited(code: Option<i32>) -> Self {
        Self {
            code,
            terminated: false,
        }
    }

    /// The generator was terminated before it finished.
    #[must_use]
    pub const fn terminated(code: Option<i32>) -> Self {
        Self {
            code,
            terminated: true,
        }
    }
}

/// The generator could not be started.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LaunchError {
    /// No executable exists at the path.
    #[error("generator program '{program}' was not found")]
    NotFound {
        /// Program path.
        program: Utf8PathBuf,
    },

    /// The file exists but cannot be executed.
    #[error("generator program '{program}' is not executable")]
    PermissionDenied {
        /// Program path.
        program: Utf8PathBuf,
    },

    /// The operating system refused to start the program.
    #[error("failed to start generator program '{program}': {reason}")]
    Spawn {
        /// Program path.
        program: Utf8PathBuf,
        /// Failure description.
        reason: String,
    },

    /// Reading failed before the program produced any output.
    #[error("generator program '{program}' failed before producing output: {reason}")]
    Read {
        /// Program path.
        program: Utf8PathBuf,
        /// Failure description.
        reason: String,
    },
}

/// Reading generator output failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorReadError {
    /// The output stream returned an I/O error.
    #[error("failed to read generator output: {0}")]
    Io(String),
}
