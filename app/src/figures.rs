use std::path::Path;

use bw_blocksize::{BandwidthFigure, DiskPanel, DriverLine};
use common::{
    BASELINE_DRIVER, BYTES_PER_MIB,
    ident::{FileKind, RunId},
    scan::scan_dir,
    summary::average_read_bandwidth,
    util::{block_size_kib, subdirs},
};
use eyre::{Context, ContextCompat, Result};
use itertools::iproduct;
use tracing::warn;

pub fn generate(input: &Path, figures: &Path) -> Result<()> {
    std::fs::create_dir_all(figures).context(format!("Create {}", figures.display()))?;

    let dirs = subdirs(input)?;
    if dirs.is_empty() {
        warn!("No dataset directories under {}", input.display());
    }
    for dir in dirs {
        handle_directory(&dir, figures)?;
    }
    Ok(())
}

fn handle_directory(dir: &Path, figures: &Path) -> Result<()> {
    let observed = scan_dir(dir, FileKind::Summary)?;
    if observed.is_empty() {
        warn!("No summaries in {}", dir.display());
        return Ok(());
    }

    let basename = dir
        .file_name()
        .and_then(|name| name.to_str())
        .context(format!("Dataset directory name {}", dir.display()))?;

    let mut drivers = observed.drivers.clone();
    drivers.remove(BASELINE_DRIVER);

    let block_sizes = observed.sorted_block_sizes()?;
    let block_sizes_kib = block_sizes
        .iter()
        .map(|block_size| block_size_kib(block_size))
        .collect::<Result<Vec<_>>>()?;

    for (suffix, mode) in iproduct!(&observed.suffixes, &observed.modes) {
        let figure_path = figures.join(format!("{basename}_{mode}{suffix}.svg"));
        println!("generating figure '{}'", figure_path.display());

        let mut panels = Vec::new();
        for disk in &observed.disks {
            let mut lines = Vec::new();
            for driver in &drivers {
                let mut values = Vec::new();
                for block_size in &block_sizes {
                    let id = RunId {
                        mode: *mode,
                        block_size: block_size.clone(),
                        driver: driver.clone(),
                        disk: disk.clone(),
                        suffix: suffix.clone(),
                        number: None,
                    };
                    let bandwidth = average_read_bandwidth(dir, &id, &observed.numbers)?;
                    values.push(bandwidth / BYTES_PER_MIB);
                }
                lines.push(DriverLine {
                    driver: driver.clone(),
                    values,
                });
            }
            panels.push(DiskPanel {
                disk: disk.clone(),
                lines,
            });
        }

        let figure = BandwidthFigure {
            mode: *mode,
            block_sizes_kib: block_sizes_kib.clone(),
            panels,
        };
        bw_blocksize::render(&figure_path, &figure)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use common::ident::Mode;
    use tempfile::tempdir;

    use super::*;

    fn write_summary(dir: &Path, id: &RunId, bw_bytes: i64) {
        let name = id.filename(FileKind::Summary);
        let data = format!(r#"{{"jobs": [{{"read": {{"bw_bytes": {bw_bytes}}}}}]}}"#);
        std::fs::write(dir.join(name), data).unwrap();
    }

    #[test]
    fn one_figure_per_mode_and_suffix() {
        let root = tempdir().unwrap();
        let dataset = root.path().join("json").join("run-2020");
        std::fs::create_dir_all(&dataset).unwrap();

        let mut id = RunId {
            mode: Mode::Seqread,
            block_size: "8k".to_owned(),
            driver: "bitlocker".to_owned(),
            disk: "ssd".to_owned(),
            suffix: String::new(),
            number: None,
        };
        for (mode, block_size) in iproduct!([Mode::Seqread, Mode::Randread], ["8k", "32k"]) {
            id.mode = mode;
            id.block_size = block_size.to_owned();
            write_summary(&dataset, &id, 200 * 1024 * 1024);
        }

        let figures = root.path().join("figures");
        generate(&root.path().join("json"), &figures).unwrap();

        assert!(figures.join("run-2020_seqread.svg").exists());
        assert!(figures.join("run-2020_randread.svg").exists());
    }

    #[test]
    fn missing_combinations_are_fatal() {
        let root = tempdir().unwrap();
        let dataset = root.path().join("json").join("run-2020");
        std::fs::create_dir_all(&dataset).unwrap();

        let id = RunId {
            mode: Mode::Seqread,
            block_size: "8k".to_owned(),
            driver: "bitlocker".to_owned(),
            disk: "ssd".to_owned(),
            suffix: String::new(),
            number: Some(1),
        };
        write_summary(&dataset, &id, 1024);
        // Second driver only has a differently numbered run, so the cross
        // product cannot be satisfied.
        write_summary(&dataset, &id.with_number(Some(2)), 1024);
        let mut other = id.clone();
        other.driver = "veracrypt".to_owned();
        write_summary(&dataset, &other, 1024);

        let figures = root.path().join("figures");
        assert!(generate(&root.path().join("json"), &figures).is_err());
    }

    #[test]
    fn baseline_driver_is_skipped() {
        let root = tempdir().unwrap();
        let dataset = root.path().join("json").join("run-2020");
        std::fs::create_dir_all(&dataset).unwrap();

        let id = RunId {
            mode: Mode::Seqread,
            block_size: "8k".to_owned(),
            driver: "bitlocker".to_owned(),
            disk: "ssd".to_owned(),
            suffix: String::new(),
            number: None,
        };
        write_summary(&dataset, &id, 100 * 1024 * 1024);
        let mut baseline = id.clone();
        baseline.driver = BASELINE_DRIVER.to_owned();
        write_summary(&dataset, &baseline, 150 * 1024 * 1024);

        let figures = root.path().join("figures");
        generate(&root.path().join("json"), &figures).unwrap();

        let svg =
            std::fs::read_to_string(figures.join("run-2020_seqread.svg")).unwrap();
        assert!(svg.contains("BitLocker"));
        assert!(!svg.contains(BASELINE_DRIVER));
    }
}
