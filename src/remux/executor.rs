use super::RemuxPlan;
use crate::error::{AppError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Runs a remux plan into an output file
pub trait RemuxExecutor {
    fn remux(&self, output: &Path, plan: &RemuxPlan) -> Result<()>;
}

/// Executes plans with `mkvmerge`
#[derive(Debug, Clone)]
pub struct Mkvmerge {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl Mkvmerge {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Kill the remux and remove its output when it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a configured executable or look `mkvmerge` up on PATH
    pub fn locate(configured: Option<&Path>) -> Result<Self> {
        match configured {
            Some(path) => Ok(Self::new(path)),
            None => which::which("mkvmerge")
                .map(Self::new)
                .map_err(|_| AppError::tool_not_found("mkvmerge")),
        }
    }

    pub fn build_args(output: &Path, plan: &RemuxPlan) -> Vec<String> {
        let mut args = vec![
            "--quiet".to_string(),
            "-o".to_string(),
            output.to_string_lossy().into_owned(),
        ];
        args.extend(plan.to_args());
        args
    }
}

impl RemuxExecutor for Mkvmerge {
    fn remux(&self, output: &Path, plan: &RemuxPlan) -> Result<()> {
        info!("Remuxing {}", output.display());
        debug!("mkvmerge -o \"{}\" {}", output.display(), plan);

        let mut child = Command::new(&self.program)
            .args(Self::build_args(output, plan))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AppError::tool_not_found("mkvmerge")
                } else {
                    AppError::Io(e)
                }
            })?;

        // Drain both pipes while waiting, a full pipe blocks mkvmerge
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = match wait_with_timeout(&mut child, self.timeout)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = std::fs::remove_file(output);
                return Err(AppError::tool_failed(
                    "mkvmerge",
                    format!("timed out after {}s", self.timeout.unwrap_or_default().as_secs()),
                ));
            }
        };

        let messages = collect_messages(stdout, stderr);
        match status.code() {
            Some(0) => Ok(()),
            // mkvmerge exits with 1 when it completed with warnings
            Some(1) => {
                for line in messages.lines().filter(|l| !l.trim().is_empty()) {
                    warn!("mkvmerge: {}", line.trim());
                }
                Ok(())
            }
            _ => {
                let _ = std::fs::remove_file(output);
                let last_lines: Vec<&str> = messages.lines().rev().take(5).collect();
                let message = if last_lines.is_empty() {
                    format!("exited with status: {}", status)
                } else {
                    last_lines.into_iter().rev().collect::<Vec<_>>().join("\n")
                };
                Err(AppError::tool_failed("mkvmerge", message))
            }
        }
    }
}

/// Poll the child until it exits; `None` when the timeout elapsed first
fn wait_with_timeout(child: &mut Child, timeout: Option<Duration>) -> Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return Ok(Some(child.wait()?));
    };

    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if started.elapsed() >= timeout {
            return Ok(None);
        }
        thread::sleep(Duration::from_millis(250));
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = pipe.read_to_end(&mut buffer);
        buffer
    })
}

/// mkvmerge reports warnings and errors on stdout
fn collect_messages(
    stdout: Option<JoinHandle<Vec<u8>>>,
    stderr: Option<JoinHandle<Vec<u8>>>,
) -> String {
    let mut messages = String::new();
    for handle in [stdout, stderr].into_iter().flatten() {
        if let Ok(bytes) = handle.join() {
            messages.push_str(&String::from_utf8_lossy(&bytes));
        }
    }
    messages
}
