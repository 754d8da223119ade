//! One full scan: validate, load, dispatch, report.

use std::io::Write;
use std::path::Path;

use crate::dispatcher::Dispatcher;
use crate::error::ScanError;
use crate::probe::Transport;
use crate::report::{alignment_width, Reporter, ScanSummary};
use crate::target;
use crate::wordlist::Wordlist;

/// Runs a scan of `raw_target` with the entries in `wordlist_path`.
///
/// Target and wordlist are validated before anything is written or any
/// request is made. Once they pass, the scan always runs to the completion
/// banner; per-probe failures are printed, not returned.
pub fn run_scan<T, W>(
    raw_target: &str,
    wordlist_path: &Path,
    transport: T,
    workers: usize,
    out: W,
) -> Result<ScanSummary, ScanError>
where
    T: Transport + 'static,
    W: Write,
{
    let target = target::normalize(raw_target)?;
    let wordlist = Wordlist::load(wordlist_path)?;
    let width = alignment_width(target.char_len(), wordlist.longest());
    let expected = wordlist.len();

    let dispatcher = Dispatcher::new(transport, workers);
    let mut reporter = Reporter::new(out, width);
    reporter.header();
    let delivered = dispatcher.run(&target, wordlist.into_entries(), |outcome| {
        reporter.report(&outcome)
    })?;
    debug_assert_eq!(delivered, expected);

    let summary = reporter.finish()?;
    tracing::info!(
        "scan of {} complete: {} found, {} not found, {} failed",
        target,
        summary.found,
        summary.not_found,
        summary.failed
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{FailureKind, TransportError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Answers 200 for every path and counts calls.
    #[derive(Default)]
    struct AllOk {
        calls: Arc<AtomicUsize>,
    }

    impl Transport for AllOk {
        fn get(&self, _url: &str) -> Result<u32, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(200)
        }
    }

    struct ByPath;

    impl Transport for ByPath {
        fn get(&self, url: &str) -> Result<u32, TransportError> {
            match url.rsplit('/').next() {
                Some("admin") => Ok(200),
                Some("slow") => Err(TransportError::new(FailureKind::Timeout, "28")),
                _ => Ok(404),
            }
        }
    }

    fn wordlist(lines: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(lines.as_bytes()).unwrap();
        f
    }

    #[test]
    fn scenario_two_hits_on_bare_host() {
        let list = wordlist("admin\nlogin\n");
        let mut out = Vec::new();
        let summary = run_scan("example.com", list.path(), AllOk::default(), 4, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let hits: Vec<&str> = text.lines().filter(|l| l.contains("Status code: 200")).collect();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().any(|l| l.starts_with("https://example.com/admin ")));
        assert!(hits.iter().any(|l| l.starts_with("https://example.com/login ")));
        assert_eq!(summary.found, 2);
    }

    #[test]
    fn not_found_entry_is_silent_and_banner_printed() {
        let list = wordlist("admin\nnothing-here\nslow\n");
        let mut out = Vec::new();
        let summary = run_scan("http://h", list.path(), ByPath, 2, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("nothing-here"));
        assert!(text.contains("Request to 'http://h/slow' timed out."));
        assert!(text.trim_end().ends_with("Scan Complete\n------------"));
        assert_eq!(
            summary,
            ScanSummary {
                found: 1,
                not_found: 1,
                failed: 1
            }
        );
    }

    #[test]
    fn missing_wordlist_makes_no_requests() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let transport = AllOk::default();
        let calls = Arc::clone(&transport.calls);
        let mut out = Vec::new();
        let err = run_scan("example.com", &path, transport, 4, &mut out).unwrap_err();
        assert_eq!(err.to_string(), format!("File not found: {}", path.display()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn invalid_target_makes_no_requests() {
        let list = wordlist("admin\n");
        let transport = AllOk::default();
        let calls = Arc::clone(&transport.calls);
        let mut out = Vec::new();
        let err = run_scan("not a url", list.path(), transport, 4, &mut out).unwrap_err();
        assert!(matches!(err, ScanError::InvalidUrl(_)));
        assert!(err.to_string().contains("is not a valid URL"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn every_entry_probed_once() {
        let lines: String = (0..200).map(|i| format!("p{}\n", i)).collect();
        let list = wordlist(&lines);
        let transport = AllOk::default();
        let calls = Arc::clone(&transport.calls);
        let summary = run_scan("http://h", list.path(), transport, 7, std::io::sink()).unwrap();
        assert_eq!(summary.total(), 200);
        assert_eq!(calls.load(Ordering::SeqCst), 200);
    }
}
