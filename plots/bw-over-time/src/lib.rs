use std::path::Path;

use common::{bwlog::BwSeries, ident::Mode};
use eyre::{Result, bail};
use plot_common::{disk_label, driver_label, mode_label, options_tail, series_color, svg_root};
use plotters::prelude::*;

/// Every trial of one driver, each an ordered (seconds, MiB/s) series.
#[derive(Debug, Clone)]
pub struct DriverSeries {
    pub driver: String,
    pub runs: Vec<BwSeries>,
}

impl DriverSeries {
    /// All runs' rate values, concatenated in run order.
    pub fn flattened(&self) -> Vec<f64> {
        self.runs
            .iter()
            .flat_map(|run| run.iter().map(|&(_, rate)| rate))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct TimePanel {
    pub disk: String,
    pub drivers: Vec<DriverSeries>,
}

/// Bandwidth-over-time data for one mode, block size and option suffix,
/// panels stacked per disk. Feeds both the line and the box-plot figure.
#[derive(Debug, Clone)]
pub struct TimeFigure {
    pub mode: Mode,
    pub block_size_kib: u64,
    pub suffix: String,
    pub panels: Vec<TimePanel>,
}

pub fn render_series(path: &Path, figure: &TimeFigure) -> Result<()> {
    if figure.panels.is_empty() {
        bail!("Nothing to draw for {}", path.display());
    }

    let root = svg_root(path)?;
    let areas = root.split_evenly((figure.panels.len(), 1));
    let title = format!(
        "{} over time {}",
        mode_label(figure.mode),
        options_tail(figure.block_size_kib, &figure.suffix)
    );

    for (panel, area) in figure.panels.iter().zip(&areas) {
        let points = panel
            .drivers
            .iter()
            .flat_map(|driver| driver.runs.iter().flatten());
        let (mut x_max, mut y_max) = (0.0_f64, 0.0_f64);
        for &(time, rate) in points {
            x_max = x_max.max(time);
            y_max = y_max.max(rate);
        }
        let y_max = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };

        let mut chart = ChartBuilder::on(area)
            .caption(
                format!("{} ({})", title, disk_label(&panel.disk)),
                ("sans-serif", 24).into_font(),
            )
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..x_max.max(1.0), 0.0..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Time [s]")
            .y_desc("Read rate [MiB/s]")
            .draw()?;

        for (index, driver) in panel.drivers.iter().enumerate() {
            let color = series_color(index);
            for (run_index, run) in driver.runs.iter().enumerate() {
                let series = chart.draw_series(LineSeries::new(
                    run.iter().copied(),
                    color.stroke_width(1),
                ))?;
                if run_index == 0 {
                    series
                        .label(driver_label(&driver.driver).to_owned())
                        .legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                        });
                }
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

pub fn render_boxplot(path: &Path, figure: &TimeFigure) -> Result<()> {
    if figure.panels.is_empty() {
        bail!("Nothing to draw for {}", path.display());
    }

    let root = svg_root(path)?;
    let areas = root.split_evenly((figure.panels.len(), 1));
    let title = format!(
        "Distribution of {} {}",
        mode_label(figure.mode).to_lowercase(),
        options_tail(figure.block_size_kib, &figure.suffix)
    );

    for (panel, area) in figure.panels.iter().zip(&areas) {
        let labels = panel
            .drivers
            .iter()
            .map(|driver| driver_label(&driver.driver).to_owned())
            .collect::<Vec<_>>();

        let mut y_max = 0.0_f64;
        for driver in &panel.drivers {
            let values = driver.flattened();
            if values.is_empty() {
                bail!("No samples for driver {}", driver.driver);
            }
            for value in values {
                y_max = y_max.max(value);
            }
        }
        let y_max = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };

        let mut chart = ChartBuilder::on(area)
            .caption(
                format!("{} ({})", title, disk_label(&panel.disk)),
                ("sans-serif", 24).into_font(),
            )
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..panel.drivers.len() as f64, 0.0_f32..y_max as f32)?;

        chart
            .configure_mesh()
            .x_labels(panel.drivers.len() * 2 + 1)
            .x_label_formatter(&|x| {
                let center = (x - 0.5).round();
                if center >= 0.0
                    && (x - 0.5 - center).abs() < 0.01
                    && (center as usize) < labels.len()
                {
                    labels[center as usize].clone()
                } else {
                    String::new()
                }
            })
            .y_desc("Read rate [MiB/s]")
            .draw()?;

        for (index, driver) in panel.drivers.iter().enumerate() {
            let quartiles = Quartiles::new(&driver.flattened());
            chart.draw_series(std::iter::once(
                Boxplot::new_vertical(index as f64 + 0.5, &quartiles).width(20),
            ))?;
        }
    }

    root.present()?;
    Ok(())
}
