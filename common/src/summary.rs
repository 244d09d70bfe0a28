use std::{collections::BTreeSet, path::Path};

use eyre::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::{
    ident::{FileKind, RunId},
    stats,
};

/// Subset of the fio JSON output the reports consume. fio emits far more;
/// unrecognized fields are ignored.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FioSummary {
    #[serde(rename = "fio version")]
    pub fio_version: Option<String>,
    pub timestamp: Option<i64>,
    pub time: Option<String>,
    pub jobs: Vec<FioJob>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FioJob {
    pub jobname: Option<String>,
    pub error: Option<i64>,
    pub read: ReadStats,
}

/// Read-direction bandwidth block of a job entry.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadStats {
    pub io_bytes: Option<i64>,
    pub bw_bytes: i64,
    pub bw: Option<i64>,
    pub iops: Option<f64>,
    pub runtime: Option<i64>,
}

pub fn read_summary(path: &Path) -> Result<FioSummary> {
    let data =
        std::fs::read_to_string(path).context(format!("Read summary {}", path.display()))?;
    serde_json::from_str(&data).context(format!("Parse summary {}", path.display()))
}

/// Mean of the per-job read bandwidth, bytes/sec.
pub fn mean_read_bandwidth(summary: &FioSummary) -> Result<f64> {
    if summary.jobs.is_empty() {
        bail!("Summary reports no jobs");
    }
    let total: i64 = summary.jobs.iter().map(|job| job.read.bw_bytes).sum();
    Ok(total as f64 / summary.jobs.len() as f64)
}

/// Mean read bandwidth over every trial of one identity, bytes/sec. The
/// run-number set must not be empty.
pub fn average_read_bandwidth(
    dir: &Path,
    id: &RunId,
    numbers: &BTreeSet<Option<u32>>,
) -> Result<f64> {
    if numbers.is_empty() {
        bail!("No run numbers for {}", id.group_label());
    }

    let mut samples = Vec::with_capacity(numbers.len());
    for number in numbers {
        let path = dir.join(id.with_number(*number).filename(FileKind::Summary));
        let summary = read_summary(&path)?;
        samples.push(
            mean_read_bandwidth(&summary).context(format!("Summary {}", path.display()))?,
        );
    }
    stats::mean(&samples)
}
