//! Metrics primitives
//!
//! Clones of a metric share its value, so the control loop and any reader
//! can each hold one.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Named 64-bit cell behind the counter and gauge
#[derive(Debug, Clone)]
struct MetricCell {
    name: Arc<str>,
    bits: Arc<AtomicU64>,
}

impl MetricCell {
    fn new(name: &str, initial: u64) -> Self {
        Self {
            name: Arc::from(name),
            bits: Arc::new(AtomicU64::new(initial)),
        }
    }
}

/// Monotonic event count, e.g. `aggregations_total`
#[derive(Debug, Clone)]
pub struct Counter(MetricCell);

impl Counter {
    pub fn new(name: &str) -> Self {
        Self(MetricCell::new(name, 0))
    }

    pub fn inc(&self) {
        self.add(1);
    }

    pub fn add(&self, n: u64) {
        self.0.bits.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.bits.load(Ordering::Relaxed)
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }
}

/// Last observed value; stored as `f64` bits
#[derive(Debug, Clone)]
pub struct Gauge(MetricCell);

impl Gauge {
    pub fn new(name: &str) -> Self {
        Self(MetricCell::new(name, 0.0f64.to_bits()))
    }

    pub fn set(&self, value: f64) {
        self.0.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.bits.load(Ordering::Relaxed))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }
}

/// Sliding-window histogram; the oldest sample is evicted once the window is full.
#[derive(Debug, Clone)]
pub struct Histogram {
    samples: Arc<parking_lot::Mutex<VecDeque<f64>>>,
    name: String,
    max_samples: usize,
}

impl Histogram {
    pub fn new(name: &str) -> Self {
        Self::with_window(name, 10_000)
    }

    pub fn with_window(name: &str, max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            samples: Arc::new(parking_lot::Mutex::new(VecDeque::with_capacity(
                max_samples.min(1024),
            ))),
            name: name.to_string(),
            max_samples,
        }
    }

    pub fn record(&self, value: f64) {
        let mut samples = self.samples.lock();
        if samples.len() >= self.max_samples {
            samples.pop_front();
        }
        samples.push_back(value);
    }

    pub fn count(&self) -> usize {
        self.samples.lock().len()
    }

    /// Nearest-rank percentile over the current window, `p` in 0..=100
    pub fn percentile(&self, p: f64) -> Option<f64> {
        let mut sorted: Vec<f64> = self.samples.lock().iter().copied().collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);
        let idx = ((sorted.len() as f64) * p.clamp(0.0, 100.0) / 100.0) as usize;
        Some(sorted[idx.min(sorted.len() - 1)])
    }

    pub fn mean(&self) -> Option<f64> {
        let samples = self.samples.lock();
        if samples.is_empty() {
            return None;
        }
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
