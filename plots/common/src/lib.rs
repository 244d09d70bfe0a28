use std::path::Path;

use common::ident::Mode;
use eyre::Result;
use plotters::{coord::Shift, prelude::*, style::RGBAColor};

pub const FIGURE_SIZE: (u32, u32) = (1000, 800);

/// White-filled SVG document root for one figure.
pub fn svg_root(path: &Path) -> Result<DrawingArea<SVGBackend<'_>, Shift>> {
    let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    Ok(root)
}

/// Stable per-series color, indexed by the driver's position in the panel.
pub fn series_color(index: usize) -> RGBAColor {
    Palette99::pick(index).to_rgba()
}

pub fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Seqread => "Sequential reading",
        Mode::Randread => "Random-access reading",
    }
}

pub fn disk_label(disk: &str) -> &str {
    match disk {
        "ssd" => "SSD",
        "hdd" => "HDD",
        other => other,
    }
}

/// Legend names for the drivers under test. Unmapped tokens show as-is.
pub fn driver_label(driver: &str) -> &str {
    match driver {
        "bitlocker" => "BitLocker",
        "veracrypt" => "VeraCrypt",
        "luks2flt-optimizedv2" => "luks2flt (optimized)",
        "luks2flt-beforemoreopts" => "luks2flt",
        "nullcrypto-disabled" => "Regular",
        "nullcrypto-enabled" => "Nullcrypto",
        other => other,
    }
}

/// Human form of the auxiliary-option suffix, e.g. "_numjobs16_iodepth16"
/// becomes "16 jobs, I/O depth 16".
pub fn suffix_label(suffix: &str) -> String {
    suffix
        .split('_')
        .filter(|token| !token.is_empty())
        .map(|token| {
            if let Some(n) = token.strip_prefix("numjobs") {
                format!("{n} jobs")
            } else if let Some(n) = token.strip_prefix("iodepth") {
                format!("I/O depth {n}")
            } else {
                token.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parenthesized block-size-and-options tail of the time-series titles.
pub fn options_tail(block_size_kib: u64, suffix: &str) -> String {
    let options = suffix_label(suffix);
    if options.is_empty() {
        format!("({block_size_kib} KiB blocks)")
    } else {
        format!("({block_size_kib} KiB blocks, {options})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_tokens_become_readable() {
        assert_eq!(suffix_label(""), "");
        assert_eq!(suffix_label("_numjobs16"), "16 jobs");
        assert_eq!(
            suffix_label("_numjobs16_iodepth16"),
            "16 jobs, I/O depth 16"
        );
        assert_eq!(suffix_label("_logmsec32"), "logmsec32");
    }

    #[test]
    fn title_tail_skips_empty_options() {
        assert_eq!(options_tail(32, ""), "(32 KiB blocks)");
        assert_eq!(options_tail(8, "_numjobs16"), "(8 KiB blocks, 16 jobs)");
    }
}
