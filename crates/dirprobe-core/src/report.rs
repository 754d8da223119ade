//! Result reporting: aligned status lines, error lines and the final banner.

use std::io::{self, Write};

use crate::probe::Outcome;

/// Status code that is never printed.
pub const NOT_FOUND: u32 = 404;

/// Spaces kept between the longest possible URL and the status column.
const STATUS_PADDING: usize = 6;

const BANNER: &str = "------------\nScan Complete\n------------";

/// Column at which status codes start.
///
/// The longest probe URL is `target + "/" + longest entry`; every line is
/// padded to that plus a fixed gap, so this is computed once per scan.
pub fn alignment_width(target_len: usize, longest_entry: usize) -> usize {
    longest_entry + target_len + 1 + STATUS_PADDING
}

/// Tally of a finished scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Successful probes with a status other than 404.
    pub found: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl ScanSummary {
    pub fn total(&self) -> usize {
        self.found + self.not_found + self.failed
    }
}

/// Writes one line per reportable outcome to `out`.
///
/// Write errors do not stop reporting; the first one is kept and returned
/// from [`Reporter::finish`].
pub struct Reporter<W: Write> {
    out: W,
    width: usize,
    summary: ScanSummary,
    write_error: Option<io::Error>,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, width: usize) -> Self {
        Self {
            out,
            width,
            summary: ScanSummary::default(),
            write_error: None,
        }
    }

    /// Prints the "Found URLs:" header.
    pub fn header(&mut self) {
        let res = writeln!(self.out, "Found URLs:\n");
        self.record(res);
    }

    pub fn report(&mut self, outcome: &Outcome) {
        let res = match outcome {
            Outcome::Success { status, .. } if *status == NOT_FOUND => {
                self.summary.not_found += 1;
                Ok(())
            }
            Outcome::Success { url, status } => {
                self.summary.found += 1;
                writeln!(self.out, "{:<width$}Status code: {}", url, status, width = self.width)
            }
            Outcome::Failure { url, kind, message } => {
                self.summary.failed += 1;
                tracing::debug!("probe {} failed ({})", url, kind);
                writeln!(self.out, "{}", message)
            }
        };
        self.record(res);
    }

    pub fn summary(&self) -> ScanSummary {
        self.summary
    }

    /// Prints the completion banner and flushes.
    pub fn finish(mut self) -> io::Result<ScanSummary> {
        let res = writeln!(self.out, "{}", BANNER).and_then(|()| self.out.flush());
        self.record(res);
        match self.write_error {
            Some(e) => Err(e),
            None => Ok(self.summary),
        }
    }

    fn record(&mut self, res: io::Result<()>) {
        if let Err(e) = res {
            if self.write_error.is_none() {
                tracing::warn!("failed to write scan output: {}", e);
                self.write_error = Some(e);
            }
        }
    }
}
