use async_trait::async_trait;
use log::{debug, error, info};
use std::fmt;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::PostgresError;

/// Environment variable the PostgreSQL client tools read the password from.
pub const PASSWORD_ENV: &str = "PGPASSWORD";

const OUTPUT_OFFSET: &str = "\n       --> ";

/// A single external command to run.
///
/// The secret is only ever placed in the child's environment, never in
/// `args`, so it does not show up in process listings.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub secret: Option<String>,
    pub log_output: bool,
    pub suppress_success_output: bool,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            secret: None,
            log_output: false,
            suppress_success_output: true,
        }
    }

    pub fn with_secret(mut self, secret: Option<&str>) -> Self {
        self.secret = secret.filter(|s| !s.is_empty()).map(str::to_string);
        self
    }

    pub fn log_output(mut self, enabled: bool) -> Self {
        self.log_output = enabled;
        self
    }

    /// Keep the output of a successful run; callers that parse it need this.
    pub fn capture_output(mut self) -> Self {
        self.suppress_success_output = false;
        self
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .field("log_output", &self.log_output)
            .field("suppress_success_output", &self.suppress_success_output)
            .finish()
    }
}

/// Outcome of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub succeeded: bool,
    pub output: String,
    pub timed_out: bool,
}

impl ActionResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            output: output.into(),
            timed_out: false,
        }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            output: output.into(),
            timed_out: false,
        }
    }

    pub fn timeout(output: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            output: output.into(),
            timed_out: true,
        }
    }

    /// Converts a failed result into a `PostgresError`, prefixing the
    /// diagnostic with `context` when one is given.
    pub fn into_result(self, context: &str) -> Result<String, PostgresError> {
        if self.succeeded {
            return Ok(self.output);
        }
        let message = if context.is_empty() {
            self.output
        } else {
            format!("{context}\n{}", self.output)
        };
        if self.timed_out {
            Err(PostgresError::Timeout(message))
        } else {
            Err(PostgresError::Subprocess(message))
        }
    }
}

/// Every external command goes through an implementation of this trait.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn invoke(&self, invocation: Invocation) -> ActionResult;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessInvoker {
    timeout: Option<Duration>,
}

enum RunError {
    Io(io::Error),
    TimedOut(Duration, Vec<u8>),
}

impl ProcessInvoker {
    /// `None` lets a command run for as long as it takes.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    async fn run(&self, invocation: &Invocation) -> Result<(ExitStatus, Vec<u8>), RunError> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(secret) = &invocation.secret {
            cmd.env(PASSWORD_ENV, secret);
        }

        let mut child = cmd.spawn().map_err(RunError::Io)?;

        // Both pipes feed one channel so the output keeps its arrival order.
        let (tx, mut rx) = mpsc::channel::<io::Result<Vec<u8>>>(32);
        if let Some(stdout) = child.stdout.take() {
            forward(stdout, tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            forward(stderr, tx.clone());
        }
        drop(tx);

        let mut output = Vec::new();
        let completion = async {
            while let Some(chunk) = rx.recv().await {
                match chunk {
                    Ok(bytes) => output.extend_from_slice(&bytes),
                    Err(e) => return Err(e),
                }
            }
            child.wait().await
        };

        let finished = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, completion).await.ok(),
            None => Some(completion.await),
        };

        match finished {
            Some(status) => Ok((status.map_err(RunError::Io)?, output)),
            None => {
                if let Err(e) = child.kill().await {
                    error!("Failed to kill {}: {e}", invocation.program);
                }
                Err(RunError::TimedOut(self.timeout.unwrap_or_default(), output))
            }
        }
    }
}

#[async_trait]
impl CommandRunner for ProcessInvoker {
    async fn invoke(&self, invocation: Invocation) -> ActionResult {
        debug!("Running command: {invocation:?}");

        let (reason, output, timed_out) = match self.run(&invocation).await {
            Ok((status, output)) if status.success() => {
                let text = String::from_utf8_lossy(&output).into_owned();
                if invocation.log_output {
                    info!("External app output:{}", indent_output(&text));
                }
                return if invocation.suppress_success_output {
                    ActionResult::success("")
                } else {
                    ActionResult::success(text)
                };
            }
            Ok((status, output)) => (status.to_string(), output, false),
            Err(RunError::Io(e)) => (e.to_string(), Vec::new(), false),
            Err(RunError::TimedOut(limit, output)) => (
                format!("timed out after {}s and was killed", limit.as_secs()),
                output,
                true,
            ),
        };

        let diagnostic = format!(
            "{} failed, error: {reason}\nOutput:\n{}",
            invocation.program,
            String::from_utf8_lossy(&output)
        );
        error!("{diagnostic}");

        if timed_out {
            ActionResult::timeout(diagnostic)
        } else {
            ActionResult::failure(diagnostic)
        }
    }
}

fn forward<R>(mut reader: R, tx: mpsc::Sender<io::Result<Vec<u8>>>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = vec![0u8; 8192];
        loop {
            match reader.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(Ok(buf[..n].to_vec())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                    break;
                }
            }
        }
    });
}

/// Formats tool output for the log, one `-->` line per output line.
pub fn indent_output(output: &str) -> String {
    format!(
        "{OUTPUT_OFFSET}{}",
        output.trim().replace('\n', OUTPUT_OFFSET)
    )
}
