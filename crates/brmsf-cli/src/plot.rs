//! SVG rendering of per-residue result tables.

use crate::config::PlotConfig;
use crate::error::{CliError, Result};
use brmsf::core::models::table::ResultTable;
use plotters::prelude::*;
use std::path::Path;

const BAND_COLOR: RGBColor = RGBColor(30, 144, 255);

/// Shift applied to residue numbers on the x axis.
///
/// A non-zero `start_resid` makes residue 1 appear at `start_resid`.
pub fn x_offset(start_resid: isize) -> isize {
    if start_resid != 0 { start_resid - 1 } else { 0 }
}

/// Upper y bound: the configured value, or the largest statistic plus one.
pub fn y_upper_bound(table: &ResultTable, config: &PlotConfig) -> f64 {
    config
        .ymax
        .unwrap_or_else(|| table.max_value().unwrap_or(0.0) + 1.0)
}

/// Draws the statistic as a line with its uncertainty band shaded, one line per
/// segment.
pub fn render_svg(table: &ResultTable, config: &PlotConfig, path: &Path) -> Result<()> {
    draw(table, config, path).map_err(|e| CliError::Plot {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn draw(table: &ResultTable, config: &PlotConfig, path: &Path) -> anyhow::Result<()> {
    let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    if table.is_empty() {
        root.draw(&Text::new(
            "No residues to display",
            (config.width as i32 / 2, config.height as i32 / 2),
            ("sans-serif", 20).into_font().color(&BLACK),
        ))?;
        root.present()?;
        return Ok(());
    }

    let offset = x_offset(config.start_resid);
    let x_of = |resid: isize| (resid + offset) as f64;
    let (x_min, x_max) = table
        .rows()
        .iter()
        .map(|row| x_of(row.resid))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
    let (x_min, x_max) = if x_min < x_max {
        (x_min, x_max)
    } else {
        (x_min - 1.0, x_max + 1.0)
    };
    let ymax = y_upper_bound(table, config);

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..ymax)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Residue")
        .y_desc(format!("RMSF ({})", table.kind().statistic_column()))
        .draw()?;

    for segment in table.rows().chunk_by(|a, b| a.segid == b.segid) {
        let mut band: Vec<(f64, f64)> = segment
            .iter()
            .map(|row| (x_of(row.resid), row.statistic.band().1))
            .collect();
        band.extend(
            segment
                .iter()
                .rev()
                .map(|row| (x_of(row.resid), row.statistic.band().0)),
        );
        chart.draw_series(std::iter::once(Polygon::new(band, BAND_COLOR.mix(0.5).filled())))?;

        chart.draw_series(LineSeries::new(
            segment
                .iter()
                .map(|row| (x_of(row.resid), row.statistic.value())),
            BAND_COLOR.stroke_width(1),
        ))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brmsf::core::models::table::{ResultRow, RowStatistic, TableKind};
    use tempfile::tempdir;

    fn config() -> PlotConfig {
        PlotConfig {
            ymax: None,
            start_resid: 0,
            width: 600,
            height: 200,
        }
    }

    fn table() -> ResultTable {
        let row = |segid: &str, resid, rmsf: f64| ResultRow {
            resid,
            resname: "ALA".to_string(),
            segid: segid.to_string(),
            statistic: RowStatistic::Interval {
                rmsf,
                low: rmsf - 0.2,
                high: rmsf + 0.3,
            },
        };
        ResultTable::new(
            TableKind::Pivot,
            vec![row("A", 1, 0.5), row("A", 2, 1.5), row("A", 3, 0.8), row("B", 1, 2.0)],
        )
    }

    #[test]
    fn offset_shifts_only_for_non_zero_start() {
        assert_eq!(x_offset(0), 0);
        assert_eq!(x_offset(1), 0);
        assert_eq!(x_offset(25), 24);
        assert_eq!(x_offset(-3), -4);
    }

    #[test]
    fn y_bound_defaults_to_max_plus_one() {
        assert_eq!(y_upper_bound(&table(), &config()), 3.0);
        let fixed = PlotConfig {
            ymax: Some(1.25),
            ..config()
        };
        assert_eq!(y_upper_bound(&table(), &fixed), 1.25);
    }

    #[test]
    fn renders_svg_with_band_and_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rmsf.svg");
        render_svg(&table(), &config(), &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("Residue"));
    }

    #[test]
    fn empty_table_renders_placeholder() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.svg");
        render_svg(&ResultTable::new(TableKind::MeanStd, Vec::new()), &config(), &path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("No residues to display"));
    }

    #[test]
    fn unwritable_path_is_plot_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("rmsf.svg");
        let err = render_svg(&table(), &config(), &path).unwrap_err();
        assert!(matches!(err, CliError::Plot { .. }));
    }
}
