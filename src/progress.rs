//! Progress reporting.
//!
//! A [`ProgressSink`] observes a pipeline run; it never influences it. The
//! pipeline goes through a [`Reporter`], which guarantees a sink sees
//! percentages that never decrease and never exceed 100.

use std::cell::Cell;

use crate::types::Phase;

/// Receives `(percent, phase label)` at each stage boundary.
pub trait ProgressSink {
    fn report(&self, percent: u8, phase: &str);
}

impl<F: Fn(u8, &str)> ProgressSink for F {
    fn report(&self, percent: u8, phase: &str) {
        self(percent, phase);
    }
}

/// Wraps an optional sink and enforces monotonic percentages.
pub(crate) struct Reporter<'a> {
    sink: Option<&'a dyn ProgressSink>,
    last: Cell<u8>,
}

impl<'a> Reporter<'a> {
    pub(crate) fn new(sink: Option<&'a dyn ProgressSink>) -> Self {
        Self { sink, last: Cell::new(0) }
    }

    pub(crate) fn stage(&self, percent: u8, phase: Phase) {
        let percent = percent.clamp(self.last.get(), 100);
        self.last.set(percent);

        if let Some(sink) = self.sink {
            sink.report(percent, phase.label());
        }
    }
}
