use crate::html;
use crate::parser::options::Options;

use std::cell::Cell;
use std::fmt;
use std::io::{self, Write};

/// State threaded through a single [`super::format_document`] call: the
/// output sink, the options in force, and a flag tracking whether the last
/// byte written was a line feed (so [`Context::cr`] knows whether it needs
/// to start a fresh line).
///
/// Writes go through `std::io::Write` rather than `std::fmt::Write`: node
/// text is `Vec<u8>` rather than `String` (spec's "invalid input framing"
/// rule passes non-UTF-8 source bytes through unchanged), so the renderer
/// has to stay byte-oriented end to end.
pub struct Context<'o> {
    output: &'o mut dyn Write,
    last_was_lf: Cell<bool>,

    /// Options in use for this render.
    pub options: &'o Options,
}

impl<'o> Context<'o> {
    pub(super) fn new(output: &'o mut dyn Write, options: &'o Options) -> Self {
        Context {
            output,
            last_was_lf: Cell::new(true),
            options,
        }
    }

    /// If the last byte written was not a line feed, writes one. Otherwise
    /// does nothing; ensures output is positioned at the start of a line.
    pub fn cr(&mut self) -> io::Result<()> {
        if !self.last_was_lf.get() {
            self.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Convenience wrapper for [`html::escape`].
    pub fn escape(&mut self, buffer: &[u8]) -> io::Result<()> {
        html::escape(self, buffer)
    }

    /// Convenience wrapper for [`html::escape_href`].
    pub fn escape_href(&mut self, buffer: &[u8]) -> io::Result<()> {
        html::escape_href(self, buffer)
    }

    /// Convenience wrapper over `write_all` for string literals.
    pub fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.write_all(s.as_bytes())
    }
}

impl<'o> Write for Context<'o> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(&last) = buf.last() {
            self.last_was_lf.set(last == b'\n');
        }
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}

impl<'o> fmt::Debug for Context<'o> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("<cmarkrs::html::Context>")
    }
}
