// Per-region sample buckets and the running average shown in the swatch bars.

use crate::types::{Region, Sample};

/// Samples grouped by region, in click order. Only ever grows.
#[derive(Default)]
pub struct SampleSet {
    buckets: [Vec<Sample>; 4],
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, region: Region, sample: Sample) {
        self.buckets[region.index()].push(sample);
    }

    pub fn samples(&self, region: Region) -> &[Sample] {
        &self.buckets[region.index()]
    }

    pub fn len(&self, region: Region) -> usize {
        self.buckets[region.index()].len()
    }

    /// Componentwise mean of every sample in `region`, truncated toward zero.
    /// `None` while the bucket is empty (no swatch is drawn).
    pub fn average(&self, region: Region) -> Option<Sample> {
        mean(self.samples(region))
    }
}

fn mean(samples: &[Sample]) -> Option<Sample> {
    if samples.is_empty() {
        return None;
    }
    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for s in samples {
        r += s.r as u64;
        g += s.g as u64;
        b += s.b as u64;
    }
    let n = samples.len() as u64;
    // Each quotient is at most 255.
    Some(Sample::new((r / n) as u8, (g / n) as u8, (b / n) as u8))
}
