//! Line-oriented diagnostic output stream
//!
//! The diagnostic stream carries the human-readable status lines the
//! controlling host scrapes. It is the device's report channel, not a
//! debug log; defmt handles the latter.

use core::fmt;
use core::fmt::Write as _;

use embedded_io::Write;
use heapless::String;

/// Longest diagnostic line the serial sink can carry, terminator included.
const LINE_CAPACITY: usize = 160;

/// Sink for diagnostic status lines.
pub trait DiagnosticSink {
    /// Append one line; the sink supplies the line terminator.
    fn write_line(&mut self, args: fmt::Arguments<'_>);

    /// Flush buffered output before the stream goes away.
    fn close(&mut self) {}
}

/// [`DiagnosticSink`] over any blocking serial writer.
///
/// Each line is staged in a fixed buffer and handed to the port in a
/// single write so lines arrive whole on the wire. Output past the
/// buffer capacity is truncated.
pub struct SerialSink<W: Write> {
    port: W,
}

impl<W: Write> SerialSink<W> {
    pub fn new(port: W) -> Self {
        Self { port }
    }
}

impl<W: Write> DiagnosticSink for SerialSink<W> {
    fn write_line(&mut self, args: fmt::Arguments<'_>) {
        let mut line: String<LINE_CAPACITY> = String::new();
        line.write_fmt(args).ok();
        line.push('\n').ok();
        self.port.write_all(line.as_bytes()).ok();
    }

    fn close(&mut self) {
        self.port.flush().ok();
    }
}
