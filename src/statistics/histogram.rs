/// Fixed-resolution histogram over `[min, max]` used to estimate the median
/// and the mode without sorting.
///
/// Values map to bin `floor((v - min) · scale)`, clamped to the last bin, with
/// `scale = bins / (max - min)`. A degenerate range uses `scale = 1`, which
/// puts every value in bin 0. Estimates are the lower edge of the selected
/// bin and thus lie within one bin width of the exact statistic.
pub(crate) struct ValueHistogram {
    counts: Vec<u64>,
    min: f64,
    scale: f64,
}

impl ValueHistogram {
    pub(crate) fn new(bins: usize, min: f64, max: f64) -> Self {
        let bins = bins.max(1);
        let scale = if max > min {
            bins as f64 / (max - min)
        } else {
            1.0
        };
        Self {
            counts: vec![0; bins],
            min,
            scale,
        }
    }

    pub(crate) fn accumulate(&mut self, value: f64) {
        let last = self.counts.len() - 1;
        let pos = (value - self.min) * self.scale;
        let idx = if pos <= 0.0 {
            0
        } else {
            (pos as usize).min(last)
        };
        self.counts[idx] += 1;
    }

    fn value(&self, bin: usize) -> f64 {
        self.min + bin as f64 / self.scale
    }

    /// Lower edge of the first bin at which the cumulative count reaches
    /// half of `total`.
    pub(crate) fn median(&self, total: u64) -> f64 {
        let half = total as f64 / 2.0;
        let mut cumulative = 0u64;
        for (bin, &count) in self.counts.iter().enumerate() {
            cumulative += count;
            if cumulative as f64 >= half {
                return self.value(bin);
            }
        }
        self.value(self.counts.len() - 1)
    }

    /// Lower edge of the most populated bin; the first one wins ties.
    pub(crate) fn mode(&self) -> f64 {
        let mut best = 0;
        for (bin, &count) in self.counts.iter().enumerate() {
            if count > self.counts[best] {
                best = bin;
            }
        }
        self.value(best)
    }

    #[cfg(test)]
    pub(crate) fn counts(&self) -> &[u64] {
        &self.counts
    }
}
