//! Thread-safe diagnostic accumulator.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// An accumulator for diagnostics emitted while reading and placing.
///
/// The sink is shared by reference between the readers, the placer and the
/// checker. The error count is tracked atomically so `has_errors` never
/// takes the lock.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    error_count: AtomicUsize,
    warning_count: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates a new empty diagnostic sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            error_count: AtomicUsize::new(0),
            warning_count: AtomicUsize::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        // A panic while holding the lock cannot leave the Vec half-pushed.
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Emits a diagnostic into the sink.
    pub fn emit(&self, diag: Diagnostic) {
        match diag.severity {
            Severity::Error => {
                self.error_count.fetch_add(1, Ordering::Relaxed);
            }
            Severity::Warning => {
                self.warning_count.fetch_add(1, Ordering::Relaxed);
            }
            Severity::Note => {}
        }
        self.lock().push(diag);
    }

    /// Returns `true` if any error-severity diagnostics have been emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count.load(Ordering::Relaxed) > 0
    }

    /// Returns the number of error-severity diagnostics emitted so far.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Returns the number of warning-severity diagnostics emitted so far.
    pub fn warning_count(&self) -> usize {
        self.warning_count.load(Ordering::Relaxed)
    }

    /// Takes all accumulated diagnostics, leaving the sink empty.
    ///
    /// The counters are not reset.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    /// Returns a snapshot of all accumulated diagnostics without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    fn make_error() -> Diagnostic {
        Diagnostic::error(DiagnosticCode::new(Category::Def, 101), "test error")
    }

    fn make_warning() -> Diagnostic {
        Diagnostic::warning(DiagnosticCode::new(Category::Lef, 201), "test warning")
    }

    #[test]
    fn empty_sink() {
        let sink = DiagnosticSink::new();
        assert!(!sink.has_errors());
        assert_eq!(sink.error_count(), 0);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn counts_by_severity() {
        let sink = DiagnosticSink::new();
        sink.emit(make_error());
        sink.emit(make_warning());
        sink.emit(make_warning());
        sink.emit(Diagnostic::note(
            DiagnosticCode::new(Category::Placement, 1),
            "fyi",
        ));
        assert!(sink.has_errors());
        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink.warning_count(), 2);
        assert_eq!(sink.diagnostics().len(), 4);
    }

    #[test]
    fn take_all_drains() {
        let sink = DiagnosticSink::new();
        sink.emit(make_error());
        sink.emit(make_warning());
        assert_eq!(sink.take_all().len(), 2);
        assert!(sink.take_all().is_empty());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn shared_across_threads() {
        use std::sync::Arc;
        use std::thread;

        let sink = Arc::new(DiagnosticSink::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for _ in 0..25 {
                        sink.emit(make_warning());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(sink.warning_count(), 100);
        assert_eq!(sink.diagnostics().len(), 100);
    }
}
