use eyre::{Result, bail};

/// Arithmetic mean. Zero samples is a caller contract violation.
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        bail!("Mean of zero samples");
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Five-number summary of a flattened set of run values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub mean: f64,
    pub median: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesStats {
    /// Population standard deviation: the recorded samples are the whole
    /// population, the denominator is the count.
    pub fn compute(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            bail!("Statistics over zero samples");
        }

        let mean = mean(values)?;
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Ok(Self {
            mean,
            median,
            stddev: variance.sqrt(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }
}
