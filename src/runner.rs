//! Running the compiled probe executable.

use crate::probe::ProbeError;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Captured result of one process run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait ProcessRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<RunOutput, ProbeError>;
}

/// Runs programs with `std::process`, optionally bounded by a timeout.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    pub timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<RunOutput, ProbeError> {
        let spawn_err = |e: std::io::Error| ProbeError::Spawn {
            program: program.to_path_buf(),
            source: e,
        };

        let Some(limit) = self.timeout else {
            let output = Command::new(program)
                .args(args)
                .output()
                .map_err(spawn_err)?;
            return Ok(RunOutput {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        };

        let mut child = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        // Drain both pipes while waiting so a chatty child cannot block on a full pipe
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let code = wait_with_limit(&mut child, limit).map_err(spawn_err)?;
        let Some(code) = code else {
            return Err(ProbeError::ExecutionTimedOut {
                program: program.to_path_buf(),
                timeout: limit,
            });
        };

        Ok(RunOutput {
            code,
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
        })
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).to_string()
    })
}

/// `Ok(None)` means the limit passed and the child was killed.
fn wait_with_limit(child: &mut Child, limit: Duration) -> std::io::Result<Option<Option<i32>>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status.code()));
        }
        if start.elapsed() >= limit {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(Duration::from_millis(10));
    }
}
