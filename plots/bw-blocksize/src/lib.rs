use std::path::Path;

use common::ident::Mode;
use eyre::{Result, bail};
use plot_common::{disk_label, driver_label, mode_label, series_color, svg_root};
use plotters::prelude::*;

/// Mean throughput of one driver along the block-size axis, MiB/s.
#[derive(Debug, Clone)]
pub struct DriverLine {
    pub driver: String,
    pub values: Vec<f64>,
}

/// One figure panel: a disk with every driver's line.
#[derive(Debug, Clone)]
pub struct DiskPanel {
    pub disk: String,
    pub lines: Vec<DriverLine>,
}

/// Throughput-versus-block-size figure, panels stacked per disk.
#[derive(Debug, Clone)]
pub struct BandwidthFigure {
    pub mode: Mode,
    /// Axis labels in KiB, already in numeric order.
    pub block_sizes_kib: Vec<u64>,
    pub panels: Vec<DiskPanel>,
}

pub fn render(path: &Path, figure: &BandwidthFigure) -> Result<()> {
    if figure.panels.is_empty() || figure.block_sizes_kib.is_empty() {
        bail!("Nothing to draw for {}", path.display());
    }
    for panel in &figure.panels {
        for line in &panel.lines {
            if line.values.len() != figure.block_sizes_kib.len() {
                bail!(
                    "Driver {} covers {} of {} block sizes",
                    line.driver,
                    line.values.len(),
                    figure.block_sizes_kib.len()
                );
            }
        }
    }

    let root = svg_root(path)?;
    let areas = root.split_evenly((figure.panels.len(), 1));
    let labels = &figure.block_sizes_kib;

    for (panel, area) in figure.panels.iter().zip(&areas) {
        let max_value = panel
            .lines
            .iter()
            .flat_map(|line| line.values.iter().copied())
            .fold(0.0_f64, f64::max);
        let y_max = if max_value > 0.0 { max_value * 1.05 } else { 1.0 };
        let x_max = ((labels.len() - 1) as f64).max(1.0);

        let mut chart = ChartBuilder::on(area)
            .caption(
                format!("{} ({})", mode_label(figure.mode), disk_label(&panel.disk)),
                ("sans-serif", 24).into_font(),
            )
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..x_max, 0.0..y_max)?;

        chart
            .configure_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|x| {
                let index = x.round() as usize;
                if (x - index as f64).abs() < 0.01 && index < labels.len() {
                    labels[index].to_string()
                } else {
                    String::new()
                }
            })
            .x_desc("Block size [KiB]")
            .y_desc("Throughput [MiB/s]")
            .draw()?;

        for (index, line) in panel.lines.iter().enumerate() {
            let color = series_color(index);
            chart
                .draw_series(LineSeries::new(
                    line.values.iter().enumerate().map(|(i, v)| (i as f64, *v)),
                    color.stroke_width(2),
                ))?
                .label(driver_label(&line.driver).to_owned())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }

        let position = match figure.mode {
            Mode::Seqread => SeriesLabelPosition::LowerLeft,
            Mode::Randread => SeriesLabelPosition::UpperLeft,
        };
        chart
            .configure_series_labels()
            .position(position)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn sample_figure() -> BandwidthFigure {
        BandwidthFigure {
            mode: Mode::Seqread,
            block_sizes_kib: vec![8, 16, 32, 64],
            panels: vec![DiskPanel {
                disk: "ssd".to_owned(),
                lines: vec![
                    DriverLine {
                        driver: "bitlocker".to_owned(),
                        values: vec![120.0, 180.0, 240.0, 280.0],
                    },
                    DriverLine {
                        driver: "veracrypt".to_owned(),
                        values: vec![100.0, 150.0, 200.0, 230.0],
                    },
                ],
            }],
        }
    }

    #[test]
    fn renders_an_svg_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("figure.svg");
        render(&path, &sample_figure()).unwrap();

        let data = std::fs::read_to_string(&path).unwrap();
        assert!(data.contains("<svg"));
        assert!(data.contains("Block size [KiB]"));
    }

    #[test]
    fn rejects_ragged_lines() {
        let mut figure = sample_figure();
        figure.panels[0].lines[0].values.pop();

        let dir = tempdir().unwrap();
        assert!(render(&dir.path().join("figure.svg"), &figure).is_err());
    }

    #[test]
    fn rejects_empty_figures() {
        let dir = tempdir().unwrap();
        let figure = BandwidthFigure {
            mode: Mode::Randread,
            block_sizes_kib: Vec::new(),
            panels: Vec::new(),
        };
        assert!(render(&dir.path().join("figure.svg"), &figure).is_err());
    }
}
