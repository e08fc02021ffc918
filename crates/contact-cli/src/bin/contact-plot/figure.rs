//! Heatmap rendering for contact matrices (SVG output).
//!
//! Uses the SVG backend to avoid system font dependencies.

use anyhow::Result;
use contact_matrix::core::io::report::ContactReport;
use plotters::prelude::*;
use plotters_svg::SVGBackend;
use std::path::Path;

const COLORBAR_WIDTH: u32 = 140;
const TICK_FONT_SIZE: u32 = 10;
const AXIS_FONT_SIZE: u32 = 16;
const COLORBAR_STEPS: usize = 100;

/// Anchor colors of the inferno colormap at 0, 0.25, 0.5, 0.75, and 1.
const INFERNO: [(u8, u8, u8); 5] = [
    (0, 0, 4),
    (87, 16, 110),
    (188, 55, 84),
    (249, 142, 9),
    (252, 255, 164),
];

/// Draws the contact matrix as a heatmap of contact percentages.
///
/// Columns (x axis) are selection A atoms and rows (y axis) are selection B
/// atoms, each cell centered on its index and labeled with the atom number.
/// A colorbar on the right maps colors to percentages.
pub fn render_heatmap(report: &ContactReport, path: &Path, size: (u32, u32)) -> Result<()> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let columns = report.column_labels();
    let rows = report.row_labels();
    if columns.is_empty() || rows.is_empty() {
        root.draw(&Text::new(
            "No contact data",
            (size.0 as i32 / 2, size.1 as i32 / 2),
            ("sans-serif", 20).into_font().color(&BLACK),
        ))?;
        root.present()?;
        return Ok(());
    }

    let (matrix_area, colorbar_area) =
        root.split_horizontally(size.0.saturating_sub(COLORBAR_WIDTH));

    let mut chart = ChartBuilder::on(&matrix_area)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(
            -0.5..columns.len() as f64 - 0.5,
            -0.5..rows.len() as f64 - 0.5,
        )?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(columns.len())
        .y_labels(rows.len())
        .x_label_formatter(&|x| cell_label(*x, columns))
        .y_label_formatter(&|y| cell_label(*y, rows))
        .label_style(("sans-serif", TICK_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_FONT_SIZE))
        .x_desc("selection A")
        .y_desc("selection B")
        .draw()?;

    chart.draw_series((0..rows.len()).flat_map(|row| {
        (0..columns.len()).map(move |column| {
            let frequency = report.get(row, column).unwrap_or(0.0);
            let (x, y) = (column as f64, row as f64);
            Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                inferno(frequency).filled(),
            )
        })
    }))?;

    let mut colorbar = ChartBuilder::on(&colorbar_area)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..1.0, 0.0..100.0)?;

    colorbar
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .label_style(("sans-serif", TICK_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_FONT_SIZE))
        .y_desc("contact percentage [%]")
        .draw()?;

    let step = 100.0 / COLORBAR_STEPS as f64;
    colorbar.draw_series((0..COLORBAR_STEPS).map(|i| {
        let low = i as f64 * step;
        Rectangle::new(
            [(0.0, low), (1.0, low + step)],
            inferno((low + step / 2.0) / 100.0).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Returns the atom label of the cell centered at `position`, or an empty
/// string between cells.
fn cell_label(position: f64, labels: &[usize]) -> String {
    let index = position.round();
    if (position - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels
        .get(index as usize)
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Maps a contact frequency in [0, 1] onto the inferno colormap.
fn inferno(value: f64) -> RGBColor {
    let scaled = value.clamp(0.0, 1.0) * (INFERNO.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(INFERNO.len() - 2);
    let t = scaled - lower as f64;
    let (r0, g0, b0) = INFERNO[lower];
    let (r1, g1, b1) = INFERNO[lower + 1];
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn report() -> ContactReport {
        ContactReport::new(
            vec![1, 2, 3],
            vec![10, 11],
            vec![1.0, 0.5, 0.0, 0.0, 0.25, 0.75],
        )
    }

    #[test]
    fn heatmap_is_written_with_axis_titles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contact.svg");

        render_heatmap(&report(), &path, (800, 600)).unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("selection A"));
        assert!(svg.contains("selection B"));
        assert!(svg.contains("contact percentage [%]"));
    }

    #[test]
    fn empty_report_draws_a_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.svg");

        render_heatmap(&ContactReport::new(vec![], vec![], vec![]), &path, (400, 300)).unwrap();

        assert!(fs::read_to_string(&path).unwrap().contains("No contact data"));
    }

    #[test]
    fn colormap_spans_inferno_endpoints() {
        assert_eq!(inferno(0.0), RGBColor(0, 0, 4));
        assert_eq!(inferno(1.0), RGBColor(252, 255, 164));
        assert_eq!(inferno(0.5), RGBColor(188, 55, 84));
        assert_eq!(inferno(-3.0), inferno(0.0));
        assert_eq!(inferno(7.0), inferno(1.0));
    }

    #[test]
    fn labels_only_at_cell_centers() {
        let labels = [7, 8];
        assert_eq!(cell_label(0.0, &labels), "7");
        assert_eq!(cell_label(1.0, &labels), "8");
        assert_eq!(cell_label(0.5, &labels), "");
        assert_eq!(cell_label(2.0, &labels), "");
        assert_eq!(cell_label(-1.0, &labels), "");
    }
}
