//! Console sinks for child process output

use std::io::{self, Write};

/// A line captured from a child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    /// Line read from standard output
    Stdout(String),
    /// Line read from standard error
    Stderr(String),
}

impl OutputLine {
    /// Line text without the stream tag
    pub fn text(&self) -> &str {
        match self {
            Self::Stdout(text) | Self::Stderr(text) => text,
        }
    }
}

/// Consumer of captured lines, called in the order lines are read
pub trait LineSink {
    /// Handle one line
    fn line(&mut self, line: OutputLine) -> io::Result<()>;

    /// Called once after both streams reached EOF
    fn finish(&mut self) -> io::Result<()>;
}

/// Prints every line as-is, stdout and stderr alike
///
/// Used for configuration runs, where both streams are shown as one.
#[derive(Debug)]
pub struct PassThrough<W: Write> {
    out: W,
}

impl<W: Write> PassThrough<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> LineSink for PassThrough<W> {
    fn line(&mut self, line: OutputLine) -> io::Result<()> {
        writeln!(self.out, "{}", line.text())?;
        self.out.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        self.out.flush()
    }
}
