use std::{collections::BTreeSet, path::Path};

use eyre::{Context, ContextCompat, Result, bail};

use crate::{
    KIB_PER_MIB, MS_PER_SEC,
    ident::{FileKind, RunId},
};

/// One fio bandwidth log: (elapsed seconds, MiB/s) in original file order.
pub type BwSeries = Vec<(f64, f64)>;

/// Parses `time_ms, kib_per_sec[, ...]` records. fio appends direction and
/// block-size columns; only the first two are consumed.
pub fn read_bw_log(path: &Path) -> Result<BwSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(format!("Open log {}", path.display()))?;

    let mut series = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.context(format!("Read log {}", path.display()))?;
        let column = |position: usize| -> Result<i64> {
            let field = record.get(position).context(format!(
                "Log {} record {index} has no column {position}",
                path.display()
            ))?;
            field.parse().context(format!(
                "Log {} record {index} column {position}: {field:?}",
                path.display()
            ))
        };

        let timestamp_ms = column(0)?;
        let kib_per_sec = column(1)?;
        series.push((
            timestamp_ms as f64 / MS_PER_SEC,
            kib_per_sec as f64 / KIB_PER_MIB,
        ));
    }
    Ok(series)
}

/// One series per trial of the identity, in run-number order. The run-number
/// set must not be empty.
pub fn load_series(
    dir: &Path,
    id: &RunId,
    numbers: &BTreeSet<Option<u32>>,
) -> Result<Vec<BwSeries>> {
    if numbers.is_empty() {
        bail!("No run numbers for {}", id.group_label());
    }
    numbers
        .iter()
        .map(|number| read_bw_log(&dir.join(id.with_number(*number).filename(FileKind::BwLog))))
        .collect()
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::ident::Mode;

    #[test]
    fn records_convert_to_seconds_and_mib() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log");
        std::fs::write(&path, "1000, 1024, 0, 32768\n2000, 2048, 0, 32768\n").unwrap();

        let series = read_bw_log(&path).unwrap();
        assert_eq!(series, vec![(1.0, 1.0), (2.0, 2.0)]);
    }

    #[test]
    fn file_order_is_preserved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log");
        std::fs::write(&path, "3000,3072\n1000,1024\n2000,2048\n").unwrap();

        let series = read_bw_log(&path).unwrap();
        assert_eq!(series, vec![(3.0, 3.0), (1.0, 1.0), (2.0, 2.0)]);
    }

    #[test]
    fn short_or_non_integer_records_fail() {
        let dir = tempdir().unwrap();

        let short = dir.path().join("short");
        std::fs::write(&short, "1000\n").unwrap();
        assert!(read_bw_log(&short).is_err());

        let garbled = dir.path().join("garbled");
        std::fs::write(&garbled, "1000, fast\n").unwrap();
        assert!(read_bw_log(&garbled).is_err());
    }

    #[test]
    fn series_load_per_trial() {
        let dir = tempdir().unwrap();
        let id = RunId {
            mode: Mode::Randread,
            block_size: "32k".to_owned(),
            driver: "veracrypt".to_owned(),
            disk: "ssd".to_owned(),
            suffix: "_logmsec32".to_owned(),
            number: None,
        };
        for number in [1, 2] {
            let name = id.with_number(Some(number)).filename(FileKind::BwLog);
            std::fs::write(
                dir.path().join(name),
                format!("1000, {}\n", number * 1024),
            )
            .unwrap();
        }

        let numbers = BTreeSet::from([Some(1), Some(2)]);
        let series = load_series(dir.path(), &id, &numbers).unwrap();
        assert_eq!(series, vec![vec![(1.0, 1.0)], vec![(1.0, 2.0)]]);

        assert!(load_series(dir.path(), &id, &BTreeSet::new()).is_err());
        assert!(load_series(dir.path(), &id, &BTreeSet::from([Some(3)])).is_err());
    }
}
