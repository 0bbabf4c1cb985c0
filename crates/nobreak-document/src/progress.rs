// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progress reporting for a single document run.

/// Receives completion fractions in `[0.0, 1.0]`.
///
/// Called synchronously from the processing thread; implementations must not
/// block for long (a UI forwards the value to its own event loop).
pub trait ProgressSink {
    fn report(&mut self, fraction: f32);
}

impl<F: FnMut(f32)> ProgressSink for F {
    fn report(&mut self, fraction: f32) {
        self(fraction)
    }
}

/// A sink that discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _fraction: f32) {}
}

/// Points in a run where progress is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Checkpoint {
    Validated,
    Extracted,
    Decoded,
    ParticlesFused,
    DatesFused,
    Written,
}

impl Checkpoint {
    pub fn fraction(&self) -> f32 {
        match self {
            Self::Validated => 0.1,
            Self::Extracted => 0.2,
            Self::Decoded => 0.4,
            Self::ParticlesFused => 0.6,
            Self::DatesFused => 0.8,
            Self::Written => 1.0,
        }
    }
}

/// Wraps a sink and guarantees the values it sees are clamped and never
/// decrease.
pub(crate) struct ProgressTracker<'a> {
    sink: &'a mut dyn ProgressSink,
    last: f32,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(sink: &'a mut dyn ProgressSink) -> Self {
        Self { sink, last: 0.0 }
    }

    pub(crate) fn checkpoint(&mut self, checkpoint: Checkpoint) {
        self.report(checkpoint.fraction());
    }

    fn report(&mut self, fraction: f32) {
        let fraction = fraction.clamp(0.0, 1.0).max(self.last);
        self.last = fraction;
        self.sink.report(fraction);
    }
}
