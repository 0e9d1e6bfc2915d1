//! System process runner
//!
//! Implements the CommandRunner port with `std::process::Command`.

use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::domain::ports::{CommandOutput, CommandRunner, CommandSpec};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Runs real processes, stdin closed, stdout/stderr captured
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.working_dir {
            command.current_dir(dir);
        }

        match spec.timeout {
            None => {
                let output = command.output()?;
                Ok(CommandOutput {
                    code: output.status.code(),
                    stdout: output.stdout,
                    stderr: output.stderr,
                })
            }
            Some(timeout) => run_with_timeout(command, timeout),
        }
    }
}

fn run_with_timeout(mut command: Command, timeout: Duration) -> io::Result<CommandOutput> {
    // Own process group, so a timeout also reaches children the command backgrounded
    #[cfg(unix)]
    std::os::unix::process::CommandExt::process_group(&mut command, 0);

    let mut child = command.spawn()?;
    // Drain pipes on their own threads so a chatty child cannot block on a full pipe
    let stdout = child.stdout.take().map(spawn_reader);
    let stderr = child.stderr.take().map(spawn_reader);

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            kill_tree(&mut child);
            return Err(timed_out(timeout));
        }
        thread::sleep(POLL_INTERVAL);
    };

    // Descendants may still hold the pipes after the shell exits
    let (stdout, stderr) = match (
        collect_reader(stdout, deadline),
        collect_reader(stderr, deadline),
    ) {
        (Some(stdout), Some(stderr)) => (stdout, stderr),
        _ => {
            kill_tree(&mut child);
            return Err(timed_out(timeout));
        }
    };

    Ok(CommandOutput {
        code: status.code(),
        stdout,
        stderr,
    })
}

fn timed_out(timeout: Duration) -> io::Error {
    io::Error::new(
        io::ErrorKind::TimedOut,
        format!("timed out after {}s", timeout.as_secs_f32()),
    )
}

/// Kill the child's whole process group, then reap the child
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        let group = format!("-{}", child.id());
        let killed = Command::new("kill")
            .args(["-KILL", "--", &group])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if !matches!(killed, Ok(status) if status.success()) {
            debug!(pid = child.id(), "process group kill failed, killing child only");
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

fn spawn_reader<R: Read + Send + 'static>(mut reader: R) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        let _ = tx.send(buf);
    });
    rx
}

/// `None` when the pipe is still open at `deadline`
fn collect_reader(reader: Option<Receiver<Vec<u8>>>, deadline: Instant) -> Option<Vec<u8>> {
    let Some(reader) = reader else {
        return Some(Vec::new());
    };
    match reader.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(buf) => Some(buf),
        Err(RecvTimeoutError::Disconnected) => Some(Vec::new()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}
