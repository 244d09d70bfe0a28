use std::path::Path;

use common::{
    ident::{FileKind, Mode, RunId},
    scan::{ObservedValues, scan_dir},
    summary::average_read_bandwidth,
    util::{block_size_kib, subdirs},
};
use eyre::{ContextCompat, Result};
use itertools::iproduct;
use tracing::{debug, warn};

pub fn run(input: &Path) -> Result<()> {
    let dirs = subdirs(input)?;
    if dirs.is_empty() {
        warn!("No dataset directories in {}", input.display());
    }
    for dir in dirs {
        compare_directory(&dir)?;
    }
    Ok(())
}

fn compare_directory(dir: &Path) -> Result<()> {
    let observed = scan_dir(dir, FileKind::Summary)?;
    if observed.is_empty() {
        warn!("No summaries in {}", dir.display());
        return Ok(());
    }

    let luks = observed
        .drivers
        .iter()
        .find(|driver| driver.contains("luks2flt-opt"))
        .context("No optimized luks2flt driver in the dataset")?;
    let bitlocker = observed
        .drivers
        .iter()
        .find(|driver| driver.as_str() == "bitlocker")
        .context("No bitlocker driver in the dataset")?;
    let veracrypt = observed
        .drivers
        .iter()
        .find(|driver| driver.as_str() == "veracrypt")
        .context("No veracrypt driver in the dataset")?;
    let disk = observed
        .disks
        .iter()
        .find(|disk| disk.contains("ssd"))
        .context("No SSD disk in the dataset")?;

    let block_sizes = observed.sorted_block_sizes()?;
    for (suffix, mode) in iproduct!(&observed.suffixes, &observed.modes) {
        let luks_bw =
            bandwidth_by_block_size(dir, &observed, *mode, suffix, luks, disk, &block_sizes)?;
        let bitlocker_bw =
            bandwidth_by_block_size(dir, &observed, *mode, suffix, bitlocker, disk, &block_sizes)?;
        let veracrypt_bw =
            bandwidth_by_block_size(dir, &observed, *mode, suffix, veracrypt, disk, &block_sizes)?;

        let luks_vs_veracrypt = ratios(&luks_bw, &veracrypt_bw);
        let luks_vs_bitlocker = ratios(&luks_bw, &bitlocker_bw);
        debug!(
            "luks2flt/VeraCrypt ratio tail: {:?}",
            &luks_vs_veracrypt[luks_vs_veracrypt.len().saturating_sub(4)..]
        );
        debug!(
            "luks2flt/BitLocker ratio tail: {:?}",
            &luks_vs_bitlocker[luks_vs_bitlocker.len().saturating_sub(4)..]
        );

        let bitlocker_peak = peak_advantage(&ratios(&bitlocker_bw, &luks_bw), &block_sizes)?;
        let bitlocker_vs_veracrypt =
            peak_advantage(&ratios(&bitlocker_bw, &veracrypt_bw), &block_sizes)?;
        let veracrypt_peak = peak_advantage(&ratios(&veracrypt_bw, &luks_bw), &block_sizes)?;
        let luks_peak = peak_advantage(&luks_vs_bitlocker, &block_sizes)?;
        let luks_vs_veracrypt_peak = peak_advantage(&luks_vs_veracrypt, &block_sizes)?;

        println!("{mode}_{disk}{suffix}");
        println!(
            "\tHighest BitLocker percentage: {:.0}% better than luks2flt (at {} KiB), \
             {:.0}% better than VeraCrypt (at {} KiB)",
            bitlocker_peak.percent,
            bitlocker_peak.block_size_kib,
            bitlocker_vs_veracrypt.percent,
            bitlocker_vs_veracrypt.block_size_kib,
        );
        println!(
            "\tHighest VeraCrypt percentage: {:.0}% better than luks2flt (at {} KiB)",
            veracrypt_peak.percent, veracrypt_peak.block_size_kib,
        );
        println!(
            "\tHighest luks2flt percentage: {:.0}% better than BitLocker (at {} KiB), \
             {:.0}% better than VeraCrypt (at {} KiB)",
            luks_peak.percent,
            luks_peak.block_size_kib,
            luks_vs_veracrypt_peak.percent,
            luks_vs_veracrypt_peak.block_size_kib,
        );
    }
    Ok(())
}

fn bandwidth_by_block_size(
    dir: &Path,
    observed: &ObservedValues,
    mode: Mode,
    suffix: &str,
    driver: &str,
    disk: &str,
    block_sizes: &[String],
) -> Result<Vec<f64>> {
    block_sizes
        .iter()
        .map(|block_size| {
            let id = RunId {
                mode,
                block_size: block_size.clone(),
                driver: driver.to_owned(),
                disk: disk.to_owned(),
                suffix: suffix.to_owned(),
                number: None,
            };
            average_read_bandwidth(dir, &id, &observed.numbers)
        })
        .collect()
}

fn ratios(numer: &[f64], denom: &[f64]) -> Vec<f64> {
    numer
        .iter()
        .zip(denom)
        .map(|(numer, denom)| numer / denom)
        .collect()
}

struct Advantage {
    percent: f64,
    block_size_kib: u64,
}

fn peak_advantage(values: &[f64], block_sizes: &[String]) -> Result<Advantage> {
    let (index, best) = values
        .iter()
        .enumerate()
        .fold(None, |best, (index, value)| match best {
            Some((_, top)) if *value <= top => best,
            _ => Some((index, *value)),
        })
        .context("No ratios to compare")?;
    Ok(Advantage {
        percent: (best * 100.0).round() - 100.0,
        block_size_kib: block_size_kib(&block_sizes[index])?,
    })
}
