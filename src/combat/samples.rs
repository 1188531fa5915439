use serde::Serialize;

/// z-value for a two-sided 95 % confidence interval.
pub const Z_95: f64 = 1.96;

/// Per-batch DPS samples of one run, in batch order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DamageSamples {
    samples: Vec<f64>,
}

impl DamageSamples {
    pub fn new(samples: Vec<f64>) -> Self {
        Self { samples }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Population variance (divides by n).
    pub fn variance(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        self.samples
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / self.samples.len() as f64
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Standard deviation of the mean estimate.
    pub fn standard_error(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.std_dev() / (self.samples.len() as f64).sqrt()
    }

    pub fn confidence_95(&self) -> f64 {
        Z_95 * self.standard_error()
    }

    pub fn summary(&self) -> DpsSummary {
        DpsSummary {
            batches: self.len(),
            mean_dps: self.mean(),
            std_dev: self.std_dev(),
            standard_error: self.standard_error(),
            confidence_95: self.confidence_95(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DpsSummary {
    pub batches: usize,
    pub mean_dps: f64,
    pub std_dev: f64,
    pub standard_error: f64,
    pub confidence_95: f64,
}

/// Standard deviation of a sum or difference of two independent estimates.
pub fn add_standard_deviations(a: f64, b: f64) -> f64 {
    (a * a + b * b).sqrt()
}
