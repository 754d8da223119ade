//! Bounded fan-out of probes over a fixed pool of worker threads.
//!
//! Every entry is queued up front. `workers` threads pull from the shared
//! queue, run one probe at a time and send the outcome back over a channel,
//! so at most `workers` requests are ever in flight. Outcomes reach the
//! caller in completion order. `run` joins every worker before returning.

use std::cell::Cell;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, Once, PoisonError};
use std::thread;

use crate::error::ScanError;
use crate::probe::{self, FailureKind, Outcome, Transport};
use crate::target::TargetUrl;

thread_local! {
    /// Set while the current thread runs a probe under `catch_unwind`.
    static IN_GUARDED_PROBE: Cell<bool> = const { Cell::new(false) };
}

static QUIET_PANIC_HOOK: Once = Once::new();

/// Wraps the process panic hook once so panics caught by `probe_guarded` are
/// not also printed to stderr; they are reported as `UnknownFailure` lines.
/// Panics anywhere else still reach the previous hook.
fn install_quiet_panic_hook() {
    QUIET_PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !IN_GUARDED_PROBE.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

/// `2 × logical cores + 1`, falling back to 1 core when parallelism is unknown.
pub fn default_workers() -> usize {
    let cores = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    2 * cores + 1
}

pub struct Dispatcher<T> {
    transport: Arc<T>,
    workers: usize,
}

impl<T: Transport + 'static> Dispatcher<T> {
    /// `workers` is floored at 1.
    pub fn new(transport: T, workers: usize) -> Self {
        Self::with_shared(Arc::new(transport), workers)
    }

    pub fn with_shared(transport: Arc<T>, workers: usize) -> Self {
        Self {
            transport,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Probes `target/entry` for every entry, handing each outcome to
    /// `on_outcome` on the calling thread as soon as it is known.
    ///
    /// Returns the number of outcomes delivered, which equals `entries.len()`.
    pub fn run<F>(
        &self,
        target: &TargetUrl,
        entries: Vec<String>,
        mut on_outcome: F,
    ) -> Result<usize, ScanError>
    where
        F: FnMut(Outcome),
    {
        let count = entries.len();
        if count == 0 {
            return Ok(0);
        }

        install_quiet_panic_hook();
        let queue: Arc<Mutex<VecDeque<String>>> = Arc::new(Mutex::new(entries.into()));
        let target = Arc::new(target.clone());
        let (tx, rx) = mpsc::channel::<Outcome>();
        let num_workers = self.workers.min(count);
        tracing::info!(
            "dispatching {} probes against {} with {} workers",
            count,
            target,
            num_workers
        );

        let mut handles = Vec::with_capacity(num_workers);
        for _ in 0..num_workers {
            let queue = Arc::clone(&queue);
            let target = Arc::clone(&target);
            let transport = Arc::clone(&self.transport);
            let tx = tx.clone();
            handles.push(thread::spawn(move || loop {
                let entry = match queue
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .pop_front()
                {
                    Some(e) => e,
                    None => break,
                };
                let url = target.join(&entry);
                let outcome = probe_guarded(transport.as_ref(), url);
                tracing::debug!("probe finished: {:?}", outcome);
                if tx.send(outcome).is_err() {
                    break;
                }
            }));
        }
        drop(tx);

        let mut delivered = 0usize;
        let mut first_error: Option<ScanError> = None;
        while delivered < count {
            match rx.recv() {
                Ok(outcome) => {
                    delivered += 1;
                    on_outcome(outcome);
                }
                Err(_) => {
                    first_error = Some(ScanError::WorkerPool(format!(
                        "result channel closed after {} of {} outcomes",
                        delivered, count
                    )));
                    break;
                }
            }
        }

        for h in handles {
            if let Err(e) = h.join() {
                if first_error.is_none() {
                    first_error = Some(ScanError::WorkerPool(format!("worker panicked: {:?}", e)));
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }
        tracing::info!("all {} probes finished", delivered);
        Ok(delivered)
    }
}

/// Runs one probe, turning a panic inside the transport into an
/// `UnknownFailure` outcome so the worker keeps going.
fn probe_guarded<T: Transport + ?Sized>(transport: &T, url: String) -> Outcome {
    let attempt = url.clone();
    IN_GUARDED_PROBE.with(|flag| flag.set(true));
    let result = panic::catch_unwind(AssertUnwindSafe(|| probe::probe(transport, attempt)));
    IN_GUARDED_PROBE.with(|flag| flag.set(false));
    match result {
        Ok(outcome) => outcome,
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "probe panicked".to_string());
            tracing::warn!("probe for {} panicked: {}", url, detail);
            Outcome::failure(url, FailureKind::UnknownFailure, &detail)
        }
    }
}
