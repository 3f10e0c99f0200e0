//! Best-effort progress reporting.
//!
//! Operators report completion as a fraction in `[0, 1]` to a
//! [`ProgressSink`]. Nested stages map their local progress into a sub-range
//! of the parent, so a composite operator (e.g. edges) drives a single
//! monotone bar across all of its differentiation passes.

/// Receiver of progress fractions.
pub trait ProgressSink {
    fn progress(&mut self, fraction: f64);
}

impl<F: FnMut(f64)> ProgressSink for F {
    fn progress(&mut self, fraction: f64) {
        self(fraction)
    }
}

/// Sink that drops every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl ProgressSink for Silent {
    fn progress(&mut self, _fraction: f64) {}
}

/// Step counter mapping local work onto a sub-range of a sink.
pub(crate) struct Progress<'a> {
    sink: &'a mut dyn ProgressSink,
    begin: f64,
    end: f64,
    steps: usize,
    done: usize,
    last_reported: f64,
}

/// Minimum change between two forwarded updates.
const REPORT_GRANULARITY: f64 = 0.01;

impl<'a> Progress<'a> {
    pub fn new(sink: &'a mut dyn ProgressSink) -> Self {
        Self {
            sink,
            begin: 0.0,
            end: 1.0,
            steps: 0,
            done: 0,
            last_reported: f64::NEG_INFINITY,
        }
    }

    /// Child covering `[from, to]` of this counter's current range.
    pub fn sub(&mut self, from: f64, to: f64) -> Progress<'_> {
        let span = self.end - self.begin;
        Progress {
            begin: self.begin + from * span,
            end: self.begin + to * span,
            steps: 0,
            done: 0,
            last_reported: f64::NEG_INFINITY,
            sink: &mut *self.sink,
        }
    }

    /// Announce the number of steps of the upcoming stage.
    pub fn steps(&mut self, steps: usize) {
        self.steps = steps;
        self.done = 0;
        self.report(self.begin);
    }

    pub fn step(&mut self) {
        self.done += 1;
        if self.steps > 0 {
            let local = (self.done as f64 / self.steps as f64).min(1.0);
            let value = self.begin + local * (self.end - self.begin);
            if value - self.last_reported >= REPORT_GRANULARITY || self.done == self.steps {
                self.report(value);
            }
        }
    }

    pub fn finish(&mut self) {
        self.report(self.end);
    }

    fn report(&mut self, value: f64) {
        self.last_reported = value;
        self.sink.progress(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_ranges_map_into_parent() {
        let mut seen = Vec::new();
        {
            let mut sink = |f: f64| seen.push(f);
            let mut root = Progress::new(&mut sink);
            {
                let mut half = root.sub(0.5, 1.0);
                half.steps(2);
                half.step();
                half.step();
            }
            root.finish();
        }
        assert_eq!(seen, vec![0.5, 0.75, 1.0, 1.0]);
    }
}
