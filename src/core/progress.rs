//! Build progress rendering
//!
//! Make prints `[ 42%]` markers at the start of its stdout lines. Those are
//! collapsed into one `Progress: 42%` line that is rewritten in place with a
//! carriage return; every other non-blank line is printed on its own line.

use regex::Regex;
use std::io::{self, Write};
use std::sync::OnceLock;

use super::console::{LineSink, OutputLine};

/// Match a progress marker at the start of a line
fn progress_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"^\s*\[\s*(\d{1,3})%\]").expect("Invalid progress marker regex")
    })
}

/// Extract the percentage from a progress marker line
///
/// Values above 100 are not treated as progress.
pub fn parse_progress(line: &str) -> Option<u8> {
    let caps = progress_marker().captures(line)?;
    let percent: u8 = caps.get(1)?.as_str().parse().ok()?;
    (percent <= 100).then_some(percent)
}

/// Line sink for build runs
#[derive(Debug)]
pub struct ProgressMultiplexer<W: Write> {
    out: W,
    /// Last percentage rendered
    last_percent: Option<u8>,
    /// Width of the progress text currently on screen, 0 if none
    last_width: usize,
}

impl<W: Write> ProgressMultiplexer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_percent: None,
            last_width: 0,
        }
    }

    /// Last percentage rendered, if any
    pub fn last_percent(&self) -> Option<u8> {
        self.last_percent
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, percent: u8) -> io::Result<()> {
        let text = format!("Progress: {percent}%");
        let padding = self.last_width.saturating_sub(text.len());
        write!(self.out, "\r{text}{:padding$}", "")?;
        self.out.flush()?;

        self.last_width = text.len();
        self.last_percent = Some(percent);
        Ok(())
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        if self.last_width > 0 {
            // Leave the progress line where it is
            writeln!(self.out)?;
            self.last_width = 0;
        }
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }
}

impl<W: Write> LineSink for ProgressMultiplexer<W> {
    fn line(&mut self, line: OutputLine) -> io::Result<()> {
        if line.text().trim().is_empty() {
            return Ok(());
        }

        match line {
            OutputLine::Stdout(text) => match parse_progress(&text) {
                Some(percent) => self.render(percent),
                None => self.print(&text),
            },
            OutputLine::Stderr(text) => self.print(&text),
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        if self.last_width > 0 {
            writeln!(self.out)?;
            self.last_width = 0;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}
