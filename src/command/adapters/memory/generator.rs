//! Scripted generator invoker for deterministic tests.

use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::command::ports::{
    GeneratorExit, GeneratorInvoker, GeneratorLines, GeneratorReadError, GeneratorRequest,
    LaunchError,
};

/// Scripted behaviour for one program path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedGenerator {
    /// Emits the lines, then ends.
    Lines(Vec<String>),
    /// Fails to launch with the given error.
    LaunchFailure(LaunchError),
    /// Emits the lines, then fails to read.
    ReadFailure {
        /// Lines emitted before the failure.
        lines: Vec<String>,
        /// Read failure description.
        reason: String,
    },
    /// Emits the lines, then never produces another line or ends.
    Endless(Vec<String>),
}

impl ScriptedGenerator {
    /// Scripts a generator emitting `lines`.
    #[must_use]
    pub fn lines(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Lines(lines.into_iter().map(Into::into).collect())
    }
}

/// In-memory generator invoker.
///
/// Programs without a script fail with [`LaunchError::NotFound`]. Every
/// launch request and close is recorded for assertions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGeneratorInvoker {
    state: Arc<Mutex<InvokerState>>,
}

#[derive(Debug, Default)]
struct InvokerState {
    scripts: HashMap<Utf8PathBuf, ScriptedGenerator>,
    launches: Vec<GeneratorRequest>,
    closed: usize,
}

impl InMemoryGeneratorInvoker {
    /// Creates an invoker without scripts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `script` with `program`, replacing any previous script.
    #[must_use]
    pub fn with_script(self, program: impl Into<Utf8PathBuf>, script: ScriptedGenerator) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.scripts.insert(program.into(), script);
        }
        self
    }

    /// Returns the recorded launch requests.
    #[must_use]
    pub fn launches(&self) -> Vec<GeneratorRequest> {
        self.state
            .lock()
            .map(|state| state.launches.clone())
            .unwrap_or_default()
    }

    /// Returns how many launched generators were closed.
    #[must_use]
    pub fn closed_count(&self) -> usize {
        self.state.lock().map(|state| state.closed).unwrap_or_default()
    }
}

#[async_trait]
impl GeneratorInvoker for InMemoryGeneratorInvoker {
    async fn launch(
        &self,
        request: &GeneratorRequest,
    ) -> Result<Box<dyn GeneratorLines>, LaunchError> {
        let script = {
            let mut state = self.state.lock().map_err(|err| LaunchError::Spawn {
                program: request.program().to_owned(),
                reason: err.to_string(),
            })?;
            state.launches.push(request.clone());
            state.scripts.get(request.program()).cloned()
        };

        let (lines, tail) = match script {
            None => {
                return Err(LaunchError::NotFound {
                    program: request.program().to_owned(),
                });
            }
            Some(ScriptedGenerator::LaunchFailure(error)) => return Err(error),
            Some(ScriptedGenerator::Lines(lines)) => (lines, Tail::End),
            Some(ScriptedGenerator::ReadFailure { lines, reason }) => (lines, Tail::Fail(reason)),
            Some(ScriptedGenerator::Endless(lines)) => (lines, Tail::Pending),
        };

        Ok(Box::new(ScriptedLines {
            queue: lines.into(),
            tail,
            state: Arc::clone(&self.state),
            exit: None,
        }))
    }
}

#[derive(Debug)]
enum Tail {
    End,
    Fail(String),
    Pending,
}

struct ScriptedLines {
    queue: VecDeque<String>,
    tail: Tail,
    state: Arc<Mutex<InvokerState>>,
    exit: Option<GeneratorExit>,
}

#[async_trait]
impl GeneratorLines for ScriptedLines {
    async fn next_line(&mut self) -> Result<Option<String>, GeneratorReadError> {
        if let Some(line) = self.queue.pop_front() {
            return Ok(Some(line));
        }
        match &self.tail {
            Tail::End => Ok(None),
            Tail::Fail(reason) => Err(GeneratorReadError::Io(reason.clone())),
            Tail::Pending => std::future::pending().await,
        }
    }

    async fn close(&mut self) -> GeneratorExit {
        if let Some(exit) = self.exit {
            return exit;
        }
        let exit = match self.tail {
            Tail::End if self.queue.is_empty() => GeneratorExit::exited(Some(0)),
            _ => GeneratorExit::terminated(None),
        };
        if let Ok(mut state) = self.state.lock() {
            state.closed += 1;
        }
        self.exit = Some(exit);
        exit
    }
}
