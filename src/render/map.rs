use std::path::{Path, PathBuf};

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::raster::{Raster, DEFAULT_DPI};
use crate::color::ColorMap;
use crate::data::filter::{strip_sentinels, SentinelSummary};
use crate::data::loader::load_spectral_table;
use crate::data::model::SpectralTable;

pub const MAP_TITLE_PREFIX: &str = "Bennu Nightingale Site";
pub const COLORBAR_LABEL: &str = "Band Depth / Strength";

/// Figure size in inches, rendered at [`DEFAULT_DPI`].
const FIGURE_INCHES: (f64, f64) = (12.0, 6.0);
const COLORBAR_WIDTH: u32 = 220;
const POINT_ALPHA: f64 = 0.8;
const GRID_DIVISIONS: usize = 6;
/// Dash and gap length of the grid lines, in pixels.
const DASH: (u32, u32) = (6, 4);

#[derive(Debug, Clone, PartialEq)]
pub enum MapOutcome {
    /// Input file does not exist; a notice was logged.
    MissingFile,
    /// File has no data extension.
    NoDataSection,
    /// Every sample was a no-data sentinel.
    NoValidData(SentinelSummary),
    Rendered {
        path: PathBuf,
        summary: SentinelSummary,
    },
}

/// `map_<first word of title>.png`.
pub fn output_filename(title: &str) -> String {
    let stem = title.split_whitespace().next().unwrap_or("untitled");
    format!("map_{stem}.png")
}

/// Load `data_dir/filename`, drop no-data pixels and save a colour-coded
/// longitude × latitude scatter map to `out_dir`.
pub fn plot_spectral_map(
    data_dir: &Path,
    filename: &str,
    title: &str,
    cmap: ColorMap,
    out_dir: &Path,
) -> Result<MapOutcome> {
    let path = data_dir.join(filename);
    if !path.exists() {
        log::warn!("File not found: {filename}");
        return Ok(MapOutcome::MissingFile);
    }

    log::info!("--- Processing: {title} ---");
    let Some(table) = load_spectral_table(&path)? else {
        log::debug!("{filename}: no data extension");
        return Ok(MapOutcome::NoDataSection);
    };

    let (clean, summary) = strip_sentinels(&table);
    log::info!("Original points: {}", summary.original);
    log::info!("Valid points: {}", summary.valid);
    let Some((min, max)) = summary.range else {
        log::warn!("{title}: every sample is a no-data sentinel, nothing to plot");
        return Ok(MapOutcome::NoValidData(summary));
    };
    log::info!("Real Data Range -> Min: {min:.4}, Max: {max:.4}");

    let out = out_dir.join(output_filename(title));
    render_scatter_map(&clean, (min, max), title, cmap, &out)?;
    log::info!("Saved clean map to: {}", out.display());
    Ok(MapOutcome::Rendered { path: out, summary })
}

/// Axis range covering `values` with a 2% margin; a flat range is widened
/// by ±0.5.
fn axis_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span.abs() < f64::EPSILON {
        return (min - 0.5, max + 0.5);
    }
    (min - span * 0.02, max + span * 0.02)
}

/// Evenly spaced interior positions for `divisions` grid cells.
fn grid_positions(lo: f64, hi: f64, divisions: usize) -> Vec<f64> {
    (1..divisions)
        .map(|k| lo + (hi - lo) * k as f64 / divisions as f64)
        .collect()
}

pub fn render_scatter_map(
    table: &SpectralTable,
    (min, max): (f64, f64),
    title: &str,
    cmap: ColorMap,
    path: &Path,
) -> Result<()> {
    let mut raster = Raster::from_inches(FIGURE_INCHES.0, FIGURE_INCHES.1, DEFAULT_DPI);
    let (width, _) = raster.size();
    let (lon_min, lon_max) = axis_range(&table.longitude);
    let (lat_min, lat_max) = axis_range(&table.latitude);

    raster.draw(|root| {
        let (plot_area, bar_area) = root.split_horizontally(width.saturating_sub(COLORBAR_WIDTH));

        let mut chart = ChartBuilder::on(&plot_area)
            .caption(format!("{MAP_TITLE_PREFIX}: {title}"), ("sans-serif", 30))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(lon_min..lon_max, lat_min..lat_max)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Longitude (deg)")
            .y_desc("Latitude (deg)")
            .label_style(("sans-serif", 18))
            .draw()?;

        let grid_style = BLACK.mix(0.25).stroke_width(1);
        let verticals = grid_positions(lon_min, lon_max, GRID_DIVISIONS)
            .into_iter()
            .map(|x| vec![(x, lat_min), (x, lat_max)]);
        let horizontals = grid_positions(lat_min, lat_max, GRID_DIVISIONS)
            .into_iter()
            .map(|y| vec![(lon_min, y), (lon_max, y)]);
        for line in verticals.chain(horizontals) {
            chart.draw_series(DashedLineSeries::new(line, DASH.0, DASH.1, grid_style))?;
        }

        chart.draw_series(table.samples().map(|s| {
            let color = cmap.color_for(s.value, min, max).mix(POINT_ALPHA);
            Circle::new((s.longitude, s.latitude), 1, color.filled())
        }))?;

        draw_colorbar(&bar_area, cmap, min, max)?;
        Ok(())
    })?;
    raster.save_png(path)
}

fn draw_colorbar(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    cmap: ColorMap,
    min: f64,
    max: f64,
) -> Result<()> {
    const STEPS: usize = 128;
    let (lo, hi) = if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };

    let mut bar = ChartBuilder::on(area)
        .margin_top(80)
        .margin_bottom(80)
        .margin_right(60)
        .y_label_area_size(110)
        .build_cartesian_2d(0.0f64..1.0f64, lo..hi)?;

    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc(COLORBAR_LABEL)
        .y_labels(6)
        .y_label_formatter(&|v: &f64| format!("{v:.3}"))
        .label_style(("sans-serif", 16))
        .draw()?;

    let span = hi - lo;
    bar.draw_series((0..STEPS).map(|i| {
        let t0 = i as f64 / STEPS as f64;
        let t1 = (i + 1) as f64 / STEPS as f64;
        Rectangle::new(
            [(0.0, lo + span * t0), (1.0, lo + span * t1)],
            cmap.color_at((t0 + t1) / 2.0).filled(),
        )
    }))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fits::{write_bintable, write_primary_header, ColumnData, TableColumn};
    use std::io::Write;

    #[test]
    fn test_output_filename_uses_first_word() {
        assert_eq!(output_filename("Organic Carbon (3.4 micron)"), "map_Organic.png");
        assert_eq!(output_filename("  Hydration (2.7 micron)"), "map_Hydration.png");
        assert_eq!(output_filename("   "), "map_untitled.png");
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let outcome = plot_spectral_map(
            data.path(),
            "does_not_exist.fits",
            "Organic Carbon (3.4 micron)",
            ColorMap::Plasma,
            out.path(),
        )
        .unwrap();
        assert_eq!(outcome, MapOutcome::MissingFile);
        assert!(!out.path().join("map_Organic.png").exists());
    }

    fn write_map(dir: &Path, name: &str, values: Option<Vec<f32>>) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        write_primary_header(&mut file).unwrap();
        if let Some(values) = values {
            let n = values.len();
            let cols = vec![
                TableColumn {
                    name: "LATITUDE".to_string(),
                    data: ColumnData::F32(vec![1.0; n]),
                },
                TableColumn {
                    name: "LONGITUDE".to_string(),
                    data: ColumnData::F32(vec![2.0; n]),
                },
                TableColumn {
                    name: "VALUE".to_string(),
                    data: ColumnData::F32(values),
                },
            ];
            write_bintable(&mut file, "MAP", &cols).unwrap();
        }
        file.flush().unwrap();
    }

    #[test]
    fn test_missing_data_section_returns_quietly() {
        let dir = tempfile::tempdir().unwrap();
        write_map(dir.path(), "empty.fits", None);
        let outcome =
            plot_spectral_map(dir.path(), "empty.fits", "Hydration", ColorMap::Viridis, dir.path()).unwrap();
        assert_eq!(outcome, MapOutcome::NoDataSection);
    }

    #[test]
    fn test_all_sentinel_map_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_map(dir.path(), "fill.fits", Some(vec![-9999.0; 4]));
        let outcome =
            plot_spectral_map(dir.path(), "fill.fits", "Hydration", ColorMap::Viridis, dir.path()).unwrap();
        assert_eq!(
            outcome,
            MapOutcome::NoValidData(SentinelSummary {
                original: 4,
                valid: 0,
                range: None
            })
        );
        assert!(!dir.path().join("map_Hydration.png").exists());
    }

    #[test]
    fn test_axis_range() {
        assert_eq!(axis_range(&[5.0, 5.0]), (4.5, 5.5));
        let (lo, hi) = axis_range(&[0.0, 100.0]);
        assert!((lo + 2.0).abs() < 1e-9 && (hi - 102.0).abs() < 1e-9);
    }

    #[test]
    fn test_grid_positions() {
        assert_eq!(grid_positions(0.0, 6.0, 6), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(grid_positions(0.0, 1.0, 1).is_empty());
    }

    #[test]
    fn test_valid_pixels_render_map_at_150_dpi() {
        let dir = tempfile::tempdir().unwrap();
        write_map(dir.path(), "ovirs.fits", Some(vec![-9999.0, -9999.0, 2.5, 3.1, -9999.0]));
        let outcome = plot_spectral_map(
            dir.path(),
            "ovirs.fits",
            "Organic Carbon (3.4 micron)",
            ColorMap::Plasma,
            dir.path(),
        )
        .unwrap();

        match outcome {
            MapOutcome::Rendered { path, summary } => {
                assert_eq!(path, dir.path().join("map_Organic.png"));
                assert_eq!(summary.original, 5);
                assert_eq!(summary.valid, 2);
                let (min, max) = summary.range.unwrap();
                assert!((min - 2.5).abs() < 1e-6);
                assert!((max - 3.1).abs() < 1e-6);
                assert_eq!(image::image_dimensions(&path).unwrap(), (1800, 900));
            }
            other => panic!("expected a rendered map, got {other:?}"),
        }
    }

    #[test]
    fn test_single_valid_pixel_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        write_map(dir.path(), "one.fits", Some(vec![-9999.0, 0.04]));
        let outcome =
            plot_spectral_map(dir.path(), "one.fits", "Hydration", ColorMap::Viridis, dir.path()).unwrap();
        assert!(matches!(outcome, MapOutcome::Rendered { .. }));
        assert!(dir.path().join("map_Hydration.png").exists());
    }
}
