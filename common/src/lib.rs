pub mod bwlog;
pub mod ident;
pub mod scan;
pub mod stats;
pub mod summary;
pub mod util;

/// Unencrypted baseline runs are captured alongside the drivers but stay out
/// of every figure.
pub const BASELINE_DRIVER: &str = "unenc";

pub const BYTES_PER_MIB: f64 = 1_048_576.0;
pub const KIB_PER_MIB: f64 = 1024.0;
pub const MS_PER_SEC: f64 = 1000.0;
