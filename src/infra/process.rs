//! Child process execution with live output
//!
//! Output reaches a single [`LineSink`] through a channel, in one of two
//! [`Capture`] modes. With separate pipes, stdout and stderr are read by one
//! task each, so neither pipe can fill up while the other is being waited on
//! and lines from one stream keep their order. With a merged pipe, both
//! streams share one pipe and the sink sees lines in the order they were
//! written.

use std::io::{self, BufRead};
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::console::{LineSink, OutputLine};
use crate::core::stage::StageOutcome;
use crate::error::ProcessError;

/// Lines buffered between the reader tasks and the sink
const LINE_BUFFER: usize = 256;

type LineResult = io::Result<OutputLine>;

/// How the output of a child is captured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// One pipe per stream; stderr lines stay tagged as stderr
    Separate,
    /// stdout and stderr share one pipe; every line is tagged as stdout
    Merged,
}

/// Run `command` to completion, feeding its output to `sink`
///
/// Errors are logged and reported as an outcome without exit code.
pub async fn run_tool<S: LineSink + ?Sized>(
    command: &mut Command,
    capture: Capture,
    sink: &mut S,
) -> StageOutcome {
    match execute(command, capture, sink).await {
        Ok(status) => {
            tracing::debug!("Command exited with {status}");
            StageOutcome::from_status(status)
        }
        Err(e) => {
            tracing::error!("{e}");
            StageOutcome::not_run()
        }
    }
}

async fn execute<S: LineSink + ?Sized>(
    command: &mut Command,
    capture: Capture,
    sink: &mut S,
) -> Result<ExitStatus, ProcessError> {
    let program = command
        .as_std()
        .get_program()
        .to_string_lossy()
        .into_owned();

    command.stdin(Stdio::null()).kill_on_drop(true);
    tracing::debug!("Running command ({capture:?} output): {:?}", command);

    let (mut child, drained) = match capture {
        Capture::Separate => {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
            let mut child = spawn(command, &program)?;
            let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
                let _ = child.start_kill();
                let _ = child.wait().await;
                return Err(ProcessError::MissingPipe {
                    program,
                    stream: "output",
                });
            };
            let drained = drain(stdout, stderr, sink).await;
            (child, drained)
        }
        Capture::Merged => {
            let (child, output) = spawn_merged(command, &program)?;
            let drained = drain_merged(output, sink).await;
            (child, drained)
        }
    };

    if drained.is_err() {
        // Nobody reads the output anymore
        let _ = child.start_kill();
    }

    let status = child.wait().await.map_err(|e| ProcessError::Wait {
        program: program.clone(),
        error: e.to_string(),
    })?;

    drained.map_err(|e| ProcessError::Read {
        program,
        error: e.to_string(),
    })?;

    Ok(status)
}

fn spawn(command: &mut Command, program: &str) -> Result<Child, ProcessError> {
    command.spawn().map_err(|e| ProcessError::Spawn {
        program: program.to_string(),
        error: e.to_string(),
    })
}

/// Spawn `command` with stdout and stderr both writing into one pipe
fn spawn_merged(
    command: &mut Command,
    program: &str,
) -> Result<(Child, os_pipe::PipeReader), ProcessError> {
    let pipe_error = |e: io::Error| ProcessError::Pipe {
        program: program.to_string(),
        error: e.to_string(),
    };
    let (reader, writer) = os_pipe::pipe().map_err(pipe_error)?;
    let stderr_writer = writer.try_clone().map_err(pipe_error)?;

    command.stdout(writer).stderr(stderr_writer);
    let spawned = spawn(command, program);
    // The command still owns our copies of the write end; the reader only
    // sees EOF once they are closed.
    command.stdout(Stdio::null()).stderr(Stdio::null());

    Ok((spawned?, reader))
}

/// Read both streams to EOF, passing every line to `sink`
///
/// `sink.finish()` runs once both streams are exhausted.
pub async fn drain<O, E, S>(stdout: O, stderr: E, sink: &mut S) -> io::Result<()>
where
    O: AsyncRead + Unpin + Send + 'static,
    E: AsyncRead + Unpin + Send + 'static,
    S: LineSink + ?Sized,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    let readers = [
        spawn_reader(stdout, OutputLine::Stdout, tx.clone()),
        spawn_reader(stderr, OutputLine::Stderr, tx),
    ];
    forward(rx, readers, sink).await
}

/// Read one merged stream to EOF, passing every line to `sink` as stdout
pub async fn drain_merged<R, S>(output: R, sink: &mut S) -> io::Result<()>
where
    R: io::Read + Send + 'static,
    S: LineSink + ?Sized,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    let reader = spawn_blocking_reader(output, tx);
    forward(rx, [reader], sink).await
}

/// Hand lines to `sink` until every reader is done
///
/// On the first error the readers are aborted and the error is returned
/// right away, without waiting for the streams to reach EOF.
async fn forward<S, const N: usize>(
    mut rx: mpsc::Receiver<LineResult>,
    readers: [JoinHandle<()>; N],
    sink: &mut S,
) -> io::Result<()>
where
    S: LineSink + ?Sized,
{
    while let Some(line) = rx.recv().await {
        if let Err(e) = line.and_then(|line| sink.line(line)) {
            for reader in &readers {
                reader.abort();
            }
            return Err(e);
        }
    }

    // Every sender is gone, so the readers have stopped
    for reader in readers {
        let _ = reader.await;
    }
    sink.finish()
}

fn spawn_reader<R>(
    reader: R,
    tag: fn(String) -> OutputLine,
    tx: mpsc::Sender<LineResult>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let item = match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => Ok(tag(decode_line(&buf))),
                Err(e) => Err(e),
            };
            let failed = item.is_err();
            if tx.send(item).await.is_err() || failed {
                break;
            }
        }
    })
}

fn spawn_blocking_reader<R>(reader: R, tx: mpsc::Sender<LineResult>) -> JoinHandle<()>
where
    R: io::Read + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut reader = io::BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let item = match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => Ok(OutputLine::Stdout(decode_line(&buf))),
                Err(e) => Err(e),
            };
            let failed = item.is_err();
            if tx.blocking_send(item).is_err() || failed {
                break;
            }
        }
    })
}

fn decode_line(buf: &[u8]) -> String {
    let text = String::from_utf8_lossy(strip_line_ending(buf)).into_owned();
    tracing::debug!(target: "build_output", "{text}");
    text
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
