use std::{collections::BTreeSet, path::Path};

use eyre::{Context, Result};
use tracing::debug;

use crate::{
    ident::{FileKind, Mode, RunId},
    util::{list_file_names, sort_block_sizes},
};

/// Distinct values seen for every identity field across one directory. The
/// report commands iterate the cross product of these sets, so a directory
/// populated purely by encoded filenames is recovered exactly.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ObservedValues {
    pub modes: BTreeSet<Mode>,
    pub block_sizes: BTreeSet<String>,
    pub drivers: BTreeSet<String>,
    pub disks: BTreeSet<String>,
    pub suffixes: BTreeSet<String>,
    /// `None` marks unnumbered files so single-trial datasets keep their
    /// encoding through a rescan.
    pub numbers: BTreeSet<Option<u32>>,
}

impl ObservedValues {
    fn insert(&mut self, id: RunId) {
        self.modes.insert(id.mode);
        self.block_sizes.insert(id.block_size);
        self.drivers.insert(id.driver);
        self.disks.insert(id.disk);
        self.suffixes.insert(id.suffix);
        self.numbers.insert(id.number);
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Block sizes in numeric order.
    pub fn sorted_block_sizes(&self) -> Result<Vec<String>> {
        sort_block_sizes(self.block_sizes.iter().cloned())
    }
}

/// Inventories identity fields over an injected listing. Names without the
/// kind's extension are skipped; a matching name that fails to decode aborts
/// the scan.
pub fn scan_names<I, S>(names: I, kind: FileKind) -> Result<ObservedValues>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut observed = ObservedValues::default();
    for name in names {
        let name = name.as_ref();
        if !name.ends_with(kind.filter_suffix()) {
            continue;
        }
        let id = RunId::parse(name, kind).context(format!("Scan {name}"))?;
        observed.insert(id);
    }
    Ok(observed)
}

/// Directory-backed scan used by the report commands.
pub fn scan_dir(dir: &Path, kind: FileKind) -> Result<ObservedValues> {
    let names = list_file_names(dir)?;
    debug!("{} entries in {}", names.len(), dir.display());
    scan_names(names, kind)
}

#[cfg(test)]
mod tests {
    use itertools::iproduct;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn scan_recovers_the_exact_cross_product() {
        let modes = [Mode::Seqread, Mode::Randread];
        let block_sizes = ["8k", "32k"];
        let drivers = ["bitlocker", "veracrypt"];
        let disks = ["ssd"];
        let numbers = [Some(1), Some(2)];

        let mut names = BTreeSet::new();
        for (mode, block_size, driver, disk, number) in
            iproduct!(modes, block_sizes, drivers, disks, numbers)
        {
            let id = RunId {
                mode,
                block_size: block_size.to_owned(),
                driver: driver.to_owned(),
                disk: disk.to_owned(),
                suffix: String::new(),
                number,
            };
            names.insert(id.filename(FileKind::Summary));
        }

        let observed = scan_names(&names, FileKind::Summary).unwrap();
        assert_eq!(observed.modes, BTreeSet::from(modes));
        assert_eq!(
            observed.block_sizes,
            BTreeSet::from(block_sizes.map(String::from))
        );
        assert_eq!(observed.drivers, BTreeSet::from(drivers.map(String::from)));
        assert_eq!(observed.disks, BTreeSet::from(disks.map(String::from)));
        assert_eq!(observed.suffixes, BTreeSet::from([String::new()]));
        assert_eq!(observed.numbers, BTreeSet::from(numbers));

        // Re-encoding the full cross product reproduces the directory:
        // nothing extra, nothing missing.
        let mut rebuilt = BTreeSet::new();
        for (mode, block_size, driver, disk, suffix, number) in iproduct!(
            &observed.modes,
            &observed.block_sizes,
            &observed.drivers,
            &observed.disks,
            &observed.suffixes,
            &observed.numbers
        ) {
            let id = RunId {
                mode: *mode,
                block_size: block_size.clone(),
                driver: driver.clone(),
                disk: disk.clone(),
                suffix: suffix.clone(),
                number: *number,
            };
            rebuilt.insert(id.filename(FileKind::Summary));
        }
        assert_eq!(rebuilt, names);
    }

    #[test]
    fn unnumbered_files_stay_distinguishable() {
        let observed =
            scan_names(["seqread_8k_bitlocker_ssd.json"], FileKind::Summary).unwrap();
        assert_eq!(observed.numbers, BTreeSet::from([None]));
    }

    #[test]
    fn scan_honors_the_dataset_kind() {
        let names = [
            "seqread_8k_bitlocker_ssd_1.json",
            "seqread_8k_bitlocker_ssd_logmsec32_bw.1.log",
            "README.md",
        ];

        let summaries = scan_names(names, FileKind::Summary).unwrap();
        assert_eq!(summaries.suffixes, BTreeSet::from([String::new()]));
        assert_eq!(summaries.numbers, BTreeSet::from([Some(1)]));

        let logs = scan_names(names, FileKind::BwLog).unwrap();
        assert_eq!(logs.suffixes, BTreeSet::from(["_logmsec32".to_owned()]));
        assert_eq!(logs.numbers, BTreeSet::from([None]));
    }

    #[test]
    fn malformed_names_abort_the_scan() {
        let names = ["seqread_8k_bitlocker_ssd_1.json", "garbage.json"];
        assert!(scan_names(names, FileKind::Summary).is_err());
    }

    #[test]
    fn scan_dir_reads_a_real_listing() {
        let dir = tempdir().unwrap();
        for name in [
            "seqread_8k_bitlocker_ssd_1.json",
            "randread_8k_bitlocker_ssd_1.json",
            "notes.txt",
        ] {
            std::fs::write(dir.path().join(name), b"{}").unwrap();
        }

        let observed = scan_dir(dir.path(), FileKind::Summary).unwrap();
        assert_eq!(observed.modes, BTreeSet::from([Mode::Seqread, Mode::Randread]));
        assert_eq!(observed.drivers, BTreeSet::from(["bitlocker".to_owned()]));
    }
}
