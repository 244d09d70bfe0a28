use std::path::Path;

use bw_over_time::{DriverSeries, TimeFigure, TimePanel};
use common::{
    BASELINE_DRIVER,
    bwlog::load_series,
    ident::{FileKind, RunId},
    scan::scan_dir,
    stats::SeriesStats,
    util::block_size_kib,
};
use eyre::{Context, ContextCompat, Result};
use itertools::iproduct;
use tracing::warn;

pub fn generate(input: &Path, figures: &Path) -> Result<()> {
    std::fs::create_dir_all(figures).context(format!("Create {}", figures.display()))?;

    let observed = scan_dir(input, FileKind::BwLog)?;
    if observed.is_empty() {
        warn!("No bandwidth logs in {}", input.display());
        return Ok(());
    }

    let basename = input
        .file_name()
        .and_then(|name| name.to_str())
        .context(format!("Dataset directory name {}", input.display()))?;
    let block_sizes = observed.sorted_block_sizes()?;
    let mut drivers = observed.drivers.clone();
    drivers.remove(BASELINE_DRIVER);

    for (suffix, mode, block_size) in
        iproduct!(&observed.suffixes, &observed.modes, &block_sizes)
    {
        let line_path = figures.join(format!("{basename}_{mode}_{block_size}{suffix}.svg"));
        println!("generating figure '{}'", line_path.display());

        let mut panels = Vec::new();
        for disk in &observed.disks {
            let mut panel_drivers = Vec::new();
            for driver in &drivers {
                let id = RunId {
                    mode: *mode,
                    block_size: block_size.clone(),
                    driver: driver.clone(),
                    disk: disk.clone(),
                    suffix: suffix.clone(),
                    number: None,
                };
                let runs = load_series(input, &id, &observed.numbers)?;
                let series = DriverSeries {
                    driver: driver.clone(),
                    runs,
                };

                let stats = SeriesStats::compute(&series.flattened())
                    .context(format!("Statistics for {}", id.group_label()))?;
                println!("{}", id.group_label());
                println!("\tmean={:.3}", stats.mean);
                println!("\tmedian={:.3}", stats.median);
                println!("\tstddev={:.3}", stats.stddev);
                println!("\tmin={:.3}", stats.min);
                println!("\tmax={:.3}", stats.max);

                panel_drivers.push(series);
            }
            panels.push(TimePanel {
                disk: disk.clone(),
                drivers: panel_drivers,
            });
        }

        let figure = TimeFigure {
            mode: *mode,
            block_size_kib: block_size_kib(block_size)?,
            suffix: suffix.clone(),
            panels,
        };
        bw_over_time::render_series(&line_path, &figure)?;

        let box_path =
            figures.join(format!("{basename}_{mode}_{block_size}{suffix}_boxplot.svg"));
        println!("generating figure '{}'", box_path.display());
        bw_over_time::render_boxplot(&box_path, &figure)?;
    }
    Ok(())
}
